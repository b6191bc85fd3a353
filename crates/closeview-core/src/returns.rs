//! Cumulative percent return relative to the first close in range.

use serde::{Deserialize, Serialize};

use crate::filter::group_by_ticker;
use crate::{InvalidBaselineError, PriceRecord, Ticker, TradingDate};

/// A single (date, value) point handed to chart renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: TradingDate,
    pub value: f64,
}

/// `(close / first_close - 1) * 100` for each record of one ticker's date-ordered series.
///
/// An empty series yields no points. A first close that is zero or subnormal,
/// or any ratio that overflows, is rejected; no point is ever non-finite.
pub fn to_percent_return(series: &[&PriceRecord]) -> Result<Vec<SeriesPoint>, InvalidBaselineError> {
    let Some(first) = series.first() else {
        return Ok(Vec::new());
    };

    let invalid = || InvalidBaselineError {
        ticker: first.ticker.clone(),
        date: first.date,
    };

    let baseline = first.close;
    if !baseline.is_normal() {
        return Err(invalid());
    }

    series
        .iter()
        .map(|record| {
            let value = (record.close / baseline - 1.0) * 100.0;
            if value.is_finite() {
                Ok(SeriesPoint {
                    date: record.date,
                    value,
                })
            } else {
                Err(invalid())
            }
        })
        .collect()
}

/// Apply [`to_percent_return`] to each ticker of an already-filtered slice.
///
/// The baseline is each ticker's earliest date inside the filtered range.
pub fn percent_return_by_ticker(
    records: &[&PriceRecord],
) -> Vec<(Ticker, Result<Vec<SeriesPoint>, InvalidBaselineError>)> {
    group_by_ticker(records)
        .into_iter()
        .map(|(ticker, group)| {
            let points = to_percent_return(&group);
            (ticker, points)
        })
        .collect()
}
