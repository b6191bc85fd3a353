//! Core engine for closeview.
//!
//! This crate contains:
//! - Validated domain types for daily price rows
//! - The read-only CSV-backed [`Dataset`]
//! - Ticker/date filtering and per-ticker percent-return normalization
//! - Chart, table, and stock views handed to renderers
//! - Response envelope and structured errors

pub mod config;
pub mod dataset;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod palette;
pub mod returns;
pub mod views;

pub use config::{DashboardConfig, DATA_PATH_ENV, DEFAULT_DATA_FILE, SCHEMA_VERSION};
pub use dataset::{Dataset, REQUIRED_COLUMNS};
pub use domain::{parse_volume, PriceRecord, Ticker, TradingDate, UtcDateTime};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{DatasetError, InvalidBaselineError, ValidationError};
pub use filter::{filter, group_by_ticker, table_order, FilterParameters, TickerSelection};
pub use palette::{color_for, FALLBACK_COLOR};
pub use returns::{percent_return_by_ticker, to_percent_return, SeriesPoint};
pub use views::{
    chart_view, stock_view, table_view, ChartMode, ChartRow, ChartSeries, ChartView,
    DashboardDefaults, SeriesStatus, StockView, TableRow, TableView, ViewRequest,
    NO_DATA_MESSAGE,
};
