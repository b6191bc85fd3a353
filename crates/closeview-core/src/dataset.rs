//! Read-only daily price dataset loaded once from CSV.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::{parse_volume, DatasetError, PriceRecord, Ticker, TradingDate};

/// Header names the loader requires, matched case-insensitively.
pub const REQUIRED_COLUMNS: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Volume", "Ticker"];

/// Immutable table of price records, ordered by (date, ticker).
///
/// Nothing mutates a dataset once it is built; every view borrows from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: String,
    records: Vec<PriceRecord>,
}

impl Dataset {
    /// Load a CSV file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: label.clone(),
            source,
        })?;
        Self::from_reader(file, label)
    }

    /// Load CSV from any reader. `label` is reported in envelopes and logs.
    pub fn from_reader<R: Read>(reader: R, label: impl Into<String>) -> Result<Self, DatasetError> {
        let label = label.into();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::resolve(reader.headers()?)?;
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(columns.parse_row(&row)?);
        }

        if records.is_empty() {
            warn!(source = %label, "dataset has a header but no rows");
        }

        let dataset = Self::build(label, records);
        dataset.log_summary();
        Ok(dataset)
    }

    /// Build a dataset from already-validated records.
    pub fn from_records(records: Vec<PriceRecord>) -> Self {
        Self::build(String::from("<memory>"), records)
    }

    fn build(source: String, mut records: Vec<PriceRecord>) -> Self {
        // Stable: duplicate (date, ticker) rows keep file order.
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));

        let duplicates = records
            .windows(2)
            .filter(|pair| pair[0].date == pair[1].date && pair[0].ticker == pair[1].ticker)
            .count();
        if duplicates > 0 {
            warn!(source = %source, duplicates, "dataset contains duplicate ticker/date rows");
        }

        Self { source, records }
    }

    fn log_summary(&self) {
        match self.date_bounds() {
            Some((first, last)) => info!(
                source = %self.source,
                records = self.records.len(),
                tickers = self.tickers().len(),
                first = %first,
                last = %last,
                "dataset loaded"
            ),
            None => info!(source = %self.source, records = 0, "dataset loaded"),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated tickers present in the dataset.
    pub fn tickers(&self) -> Vec<Ticker> {
        self.records
            .iter()
            .map(|record| record.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains_ticker(&self, ticker: &Ticker) -> bool {
        self.records.iter().any(|record| &record.ticker == ticker)
    }

    /// Earliest and latest dates, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(TradingDate, TradingDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }
}

struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    ticker: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let lowered = headers
            .iter()
            .map(|header| header.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect::<Vec<_>>();
        debug!(headers = ?lowered, "resolving dataset columns");

        let find = |column: &'static str| {
            lowered
                .iter()
                .position(|header| header.eq_ignore_ascii_case(column))
                .ok_or(DatasetError::MissingColumn { column })
        };

        Ok(Self {
            date: find(REQUIRED_COLUMNS[0])?,
            open: find(REQUIRED_COLUMNS[1])?,
            high: find(REQUIRED_COLUMNS[2])?,
            low: find(REQUIRED_COLUMNS[3])?,
            close: find(REQUIRED_COLUMNS[4])?,
            volume: find(REQUIRED_COLUMNS[5])?,
            ticker: find(REQUIRED_COLUMNS[6])?,
        })
    }

    fn parse_row(&self, row: &StringRecord) -> Result<PriceRecord, DatasetError> {
        let line = row.position().map(|position| position.line()).unwrap_or(0);
        let cell = |index: usize| row.get(index).unwrap_or("");
        let invalid_row = |source| DatasetError::InvalidRow { line, source };

        let ticker = Ticker::parse(cell(self.ticker)).map_err(invalid_row)?;
        let date = TradingDate::parse(cell(self.date)).map_err(invalid_row)?;
        let volume = parse_volume(cell(self.volume)).map_err(invalid_row)?;

        let price = |field: &'static str, index: usize| {
            let value = cell(index);
            value
                .parse::<f64>()
                .map_err(|_| DatasetError::InvalidNumber {
                    line,
                    field,
                    value: value.to_owned(),
                })
        };

        PriceRecord::new(
            ticker,
            date,
            price("open", self.open)?,
            price("high", self.high)?,
            price("low", self.low)?,
            price("close", self.close)?,
            volume,
        )
        .map_err(invalid_row)
    }
}
