//! Canonical domain types for daily price data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase stock ticker |
//! | [`TradingDate`] | Calendar date with time-of-day discarded |
//! | [`PriceRecord`] | One OHLCV row for a ticker and date |
//! | [`UtcDateTime`] | UTC timestamp used in envelope metadata |
//!
//! All types validate at construction; a [`PriceRecord`] that exists has
//! finite, non-negative prices.

mod date;
mod record;
mod ticker;

pub use date::{TradingDate, UtcDateTime};
pub use record::{parse_volume, PriceRecord};
pub use ticker::Ticker;
