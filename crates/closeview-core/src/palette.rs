//! Static ticker-to-color assignments for chart series.

use crate::Ticker;

/// Color used for tickers without an assignment.
pub const FALLBACK_COLOR: &str = "#aaaaaa";

const PALETTE: [(&str, &str); 18] = [
    ("AMZN", "#4DB6AC"),
    ("KO", "#EF5350"),
    ("UBER", "#FAFAFA"),
    ("PEP", "#42A5F5"),
    ("TSLA", "#FF7043"),
    ("AAPL", "#90CAF9"),
    ("MSFT", "#FFD54F"),
    ("NVDA", "#66BB6A"),
    ("NFLX", "#E53935"),
    ("DIS", "#5C6BC0"),
    ("NKE", "#ECECEC"),
    ("F", "#29B6F6"),
    ("WMT", "#81D4FA"),
    ("PFE", "#64B5F6"),
    ("META", "#4A90E2"),
    ("GOOG", "#8EACBB"),
    ("MA", "#FFB74D"),
    ("V", "#4FC3F7"),
];

pub fn color_for(ticker: &Ticker) -> &'static str {
    PALETTE
        .iter()
        .find(|(symbol, _)| *symbol == ticker.as_str())
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
