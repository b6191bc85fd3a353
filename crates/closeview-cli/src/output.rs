pub mod transcript;

use std::io::{self, Write};

use closeview_core::Envelope;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_envelope(&mut out, envelope, format, pretty)
}

pub fn write_envelope<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(out, envelope)?,
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    if let Some(trace_id) = &envelope.meta.trace_id {
        writeln!(out, "trace_id    : {trace_id}")?;
    }
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "dataset     : {}", envelope.meta.dataset)?;
    writeln!(out, "rows        : {}", envelope.meta.row_count)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    match tabular_rows(&envelope.data) {
        Some(rows) => write_grid(out, rows)?,
        None => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Grid column order; keys not listed here follow in map order.
const COLUMN_ORDER: [&str; 8] = [
    "date", "open", "high", "low", "close", "volume", "ticker", "value",
];

/// `data.rows` when it is a list of flat objects (table view, flat chart).
fn tabular_rows(data: &Value) -> Option<Vec<&Map<String, Value>>> {
    data.get("rows")?
        .as_array()?
        .iter()
        .map(Value::as_object)
        .collect()
}

fn write_grid<W: Write>(out: &mut W, rows: Vec<&Map<String, Value>>) -> Result<(), CliError> {
    let Some(first) = rows.first() else {
        writeln!(out, "  (no rows)")?;
        return Ok(());
    };

    let columns = COLUMN_ORDER
        .iter()
        .filter(|column| first.contains_key(**column))
        .map(|column| (*column).to_owned())
        .chain(
            first
                .keys()
                .filter(|key| !COLUMN_ORDER.contains(&key.as_str()))
                .cloned(),
        )
        .collect::<Vec<_>>();
    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| cell_text(row.get(column)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let header = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(column, width)| format!("{column:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "  {}", header.trim_end())?;

    for row in &cells {
        let line = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "  {}", line.trim_end())?;
    }

    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(float) if !number.is_u64() && !number.is_i64() => format!("{float:.2}"),
            _ => number.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use closeview_core::EnvelopeMeta;
    use serde_json::json;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", "v1.0.0", "Datos.csv", 2, 0)
            .expect("valid meta");
        Envelope::success(meta, data)
    }

    #[test]
    fn table_format_aligns_row_objects() {
        let envelope = envelope(json!({
            "rows": [
                { "date": "2023-01-02", "close": 130.0, "ticker": "AAPL" },
                { "date": "2023-01-03", "close": 143.5, "ticker": "AAPL" },
            ]
        }));

        let mut sink = Vec::new();
        write_envelope(&mut sink, &envelope, OutputFormat::Table, false).expect("renders");
        let text = String::from_utf8(sink).expect("utf8");

        assert!(text.contains("dataset     : Datos.csv"));
        assert!(text.contains("2023-01-03"));
        assert!(text.contains("143.50"));
        assert!(text.contains("ticker"));
    }

    #[test]
    fn table_format_keeps_price_column_order() {
        let envelope = envelope(json!({
            "rows": [{
                "close": 143.0,
                "date": "2023-01-03",
                "high": 144.0,
                "low": 139.0,
                "open": 140.0,
                "ticker": "AAPL",
                "volume": 1500,
            }]
        }));

        let mut sink = Vec::new();
        write_envelope(&mut sink, &envelope, OutputFormat::Table, false).expect("renders");
        let text = String::from_utf8(sink).expect("utf8");

        let header = text
            .lines()
            .skip_while(|line| *line != "data:")
            .nth(1)
            .expect("grid header");
        let names = header.split_whitespace().collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["date", "open", "high", "low", "close", "volume", "ticker"]
        );
    }

    #[test]
    fn table_format_notes_empty_rows() {
        let envelope = envelope(json!({ "rows": [] }));

        let mut sink = Vec::new();
        write_envelope(&mut sink, &envelope, OutputFormat::Table, false).expect("renders");
        assert!(String::from_utf8(sink).expect("utf8").contains("(no rows)"));
    }

    #[test]
    fn json_format_is_single_line() {
        let envelope = envelope(json!({ "series": [] }));

        let mut sink = Vec::new();
        write_envelope(&mut sink, &envelope, OutputFormat::Json, false).expect("renders");
        let text = String::from_utf8(sink).expect("utf8");

        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(parsed["meta"]["schema_version"], Value::from("v1.0.0"));
    }
}
