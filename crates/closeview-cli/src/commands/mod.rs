mod chart;
pub mod session;
mod stock;
mod table;
mod tickers;

use std::time::Instant;

use closeview_core::{
    DashboardConfig, DashboardDefaults, Dataset, Envelope, EnvelopeError, Ticker, TickerSelection,
    TradingDate, ValidationError, ViewRequest,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command, WindowArgs};
use crate::error::CliError;
use crate::metadata::{Metadata, TraceId};

/// Everything a command needs: the loaded dataset and the derived control defaults.
pub struct Context<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a DashboardConfig,
    pub defaults: DashboardDefaults,
    pub trace_id: TraceId,
}

impl<'a> Context<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a DashboardConfig) -> Self {
        Self {
            dataset,
            config,
            defaults: DashboardDefaults::from_dataset(dataset, config),
            trace_id: TraceId::new(),
        }
    }

    /// Wrap a command result in a validated envelope.
    pub fn envelope(
        &self,
        result: CommandResult,
        started: Instant,
    ) -> Result<Envelope<Value>, CliError> {
        let CommandResult {
            data,
            warnings,
            errors,
            row_count,
        } = result;

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut metadata = Metadata::new(
            self.trace_id.clone(),
            self.dataset.source(),
            row_count,
            latency_ms,
        );
        for warning in warnings {
            metadata.push_warning(warning);
        }

        let meta = metadata.into_envelope_meta(&self.config.schema_version)?;
        Envelope::with_errors(meta, data, errors).map_err(CliError::from)
    }

    /// Warnings for selected tickers that have no rows at all.
    fn unknown_ticker_warnings(&self, request: &ViewRequest) -> Vec<String> {
        let (selection, _) = request.resolve(&self.defaults);
        selection
            .as_slice()
            .iter()
            .filter(|ticker| !self.dataset.contains_ticker(ticker))
            .map(|ticker| format!("ticker '{ticker}' not found in dataset"))
            .collect()
    }
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub row_count: usize,
}

impl CommandResult {
    pub fn ok(data: Value, row_count: usize) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            row_count,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub fn run(cli: &Cli, context: &Context<'_>) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let result = match &cli.command {
        Command::Tickers => tickers::run(context)?,
        Command::Chart(args) => chart::run(args, context)?,
        Command::Table(args) => table::run(args, context)?,
        Command::Stock(args) => stock::run(args, context)?,
        Command::Session => {
            return Err(CliError::Command(String::from(
                "session output is streamed and has no single envelope",
            )))
        }
    };

    debug!(rows = result.row_count, "command complete");
    context.envelope(result, started)
}

fn parse_selection(tickers: Option<&[String]>) -> Result<Option<TickerSelection>, ValidationError> {
    let Some(tickers) = tickers else {
        return Ok(None);
    };

    // `--tickers ""` is an explicit empty selection.
    let parsed = tickers
        .iter()
        .filter(|ticker| !ticker.trim().is_empty())
        .map(|ticker| Ticker::parse(ticker))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(TickerSelection::new(parsed)))
}

fn parse_date(value: Option<&str>) -> Result<Option<TradingDate>, ValidationError> {
    value.map(TradingDate::parse).transpose()
}

fn window_request(args: &WindowArgs, percent: bool) -> Result<ViewRequest, ValidationError> {
    let request = ViewRequest {
        tickers: parse_selection(args.tickers.as_deref())?,
        start: parse_date(args.from.as_deref())?,
        end: parse_date(args.to.as_deref())?,
        percent,
    };
    Ok(request)
}

fn range_warnings(start: TradingDate, end: TradingDate) -> Vec<String> {
    if start > end {
        vec![format!("date range is inverted ({start} > {end}); nothing selected")]
    } else {
        Vec::new()
    }
}
