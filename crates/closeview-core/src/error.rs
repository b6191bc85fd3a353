use thiserror::Error;

use crate::{Ticker, TradingDate};

/// Validation and contract errors exposed by `closeview-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter or '^': '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD (optionally followed by a time): '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("volume must be a non-negative whole number: '{value}'")]
    InvalidVolume { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Fatal failures while loading the price dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: ValidationError,
    },

    #[error("line {line}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Percent-return baseline (first close in range) is zero, subnormal, or too small for the series.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("percent return for {ticker} has an unusable baseline close on {date}")]
pub struct InvalidBaselineError {
    pub ticker: Ticker,
    pub date: TradingDate,
}
