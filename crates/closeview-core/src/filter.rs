//! Ticker/date-range filtering over a [`Dataset`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Dataset, PriceRecord, Ticker, TradingDate};

/// Tickers in the order the caller picked them, without repeats.
///
/// Chart series follow this order; filtering only needs the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerSelection(Vec<Ticker>);

impl TickerSelection {
    pub fn new(tickers: impl IntoIterator<Item = Ticker>) -> Self {
        let mut seen = BTreeSet::new();
        let ordered = tickers
            .into_iter()
            .filter(|ticker| seen.insert(ticker.clone()))
            .collect();
        Self(ordered)
    }

    pub fn as_slice(&self) -> &[Ticker] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_set(&self) -> BTreeSet<Ticker> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<Ticker> for TickerSelection {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Parameters supplied on every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParameters {
    pub tickers: BTreeSet<Ticker>,
    pub start: TradingDate,
    pub end: TradingDate,
    #[serde(default)]
    pub percent: bool,
}

impl FilterParameters {
    pub fn new(
        tickers: impl IntoIterator<Item = Ticker>,
        start: TradingDate,
        end: TradingDate,
    ) -> Self {
        Self {
            tickers: tickers.into_iter().collect(),
            start,
            end,
            percent: false,
        }
    }

    pub fn with_percent(mut self, percent: bool) -> Self {
        self.percent = percent;
        self
    }

    fn admits(&self, record: &PriceRecord) -> bool {
        self.start <= record.date && record.date <= self.end && self.tickers.contains(&record.ticker)
    }
}

/// Records matching the selected tickers inside `[start, end]`, ordered by date then ticker.
///
/// An empty selection, an unknown ticker, or an inverted range yields an empty result.
pub fn filter<'a>(dataset: &'a Dataset, params: &FilterParameters) -> Vec<&'a PriceRecord> {
    if params.tickers.is_empty() {
        return Vec::new();
    }
    if params.start > params.end {
        debug!(start = %params.start, end = %params.end, "inverted date range, nothing selected");
        return Vec::new();
    }

    // Dataset order is already (date, ticker).
    dataset
        .records()
        .iter()
        .filter(|record| params.admits(record))
        .collect()
}

/// Re-sort filtered records by (ticker, date) for tabular display.
pub fn table_order<'a>(records: &[&'a PriceRecord]) -> Vec<&'a PriceRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by(|a, b| a.ticker.cmp(&b.ticker).then_with(|| a.date.cmp(&b.date)));
    ordered
}

/// Split date-ordered records into one date-ordered group per ticker, in ticker order.
pub fn group_by_ticker<'a>(records: &[&'a PriceRecord]) -> Vec<(Ticker, Vec<&'a PriceRecord>)> {
    let mut groups: Vec<(Ticker, Vec<&'a PriceRecord>)> = Vec::new();
    for record in table_order(records) {
        match groups.last_mut() {
            Some((ticker, group)) if *ticker == record.ticker => group.push(record),
            _ => groups.push((record.ticker.clone(), vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, date: &str, close: f64) -> PriceRecord {
        PriceRecord::new(
            Ticker::parse(ticker).expect("ticker"),
            TradingDate::parse(date).expect("date"),
            close,
            close,
            close,
            close,
            1,
        )
        .expect("record")
    }

    fn date(value: &str) -> TradingDate {
        TradingDate::parse(value).expect("date")
    }

    fn tickers(values: &[&str]) -> Vec<Ticker> {
        values
            .iter()
            .map(|value| Ticker::parse(value).expect("ticker"))
            .collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("V", "2023-01-04", 212.0),
            record("MA", "2023-01-03", 350.0),
            record("V", "2023-01-03", 210.0),
            record("KO", "2023-01-03", 63.0),
            record("MA", "2023-01-04", 355.0),
            record("MA", "2023-01-05", 351.0),
        ])
    }

    #[test]
    fn keeps_selected_tickers_inside_inclusive_range() {
        let dataset = dataset();
        let params = FilterParameters::new(
            tickers(&["MA", "V"]),
            date("2023-01-03"),
            date("2023-01-04"),
        );

        let rows = filter(&dataset, &params);
        let labels = rows
            .iter()
            .map(|record| format!("{}:{}", record.date, record.ticker))
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            vec![
                "2023-01-03:MA",
                "2023-01-03:V",
                "2023-01-04:MA",
                "2023-01-04:V"
            ]
        );
    }

    #[test]
    fn empty_selection_returns_nothing() {
        let dataset = dataset();
        let params = FilterParameters::new(Vec::new(), date("2023-01-01"), date("2023-12-31"));
        assert!(filter(&dataset, &params).is_empty());
    }

    #[test]
    fn inverted_range_returns_nothing() {
        let dataset = dataset();
        let params = FilterParameters::new(tickers(&["MA"]), date("2023-01-05"), date("2023-01-03"));
        assert!(filter(&dataset, &params).is_empty());
    }

    #[test]
    fn table_order_sorts_by_ticker_then_date() {
        let dataset = dataset();
        let params = FilterParameters::new(
            tickers(&["MA", "V", "KO"]),
            date("2023-01-01"),
            date("2023-01-31"),
        );

        let ordered = table_order(&filter(&dataset, &params));
        let labels = ordered
            .iter()
            .map(|record| format!("{}:{}", record.ticker, record.date))
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            vec![
                "KO:2023-01-03",
                "MA:2023-01-03",
                "MA:2023-01-04",
                "MA:2023-01-05",
                "V:2023-01-03",
                "V:2023-01-04"
            ]
        );
    }

    #[test]
    fn groups_per_ticker_in_date_order() {
        let dataset = dataset();
        let params = FilterParameters::new(
            tickers(&["V", "MA"]),
            date("2023-01-04"),
            date("2023-01-05"),
        );

        let groups = group_by_ticker(&filter(&dataset, &params));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.as_str(), "MA");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].date, date("2023-01-04"));
        assert_eq!(groups[1].0.as_str(), "V");
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn selection_drops_repeats_and_keeps_order() {
        let selection = TickerSelection::new(tickers(&["V", "MA", "V"]));
        assert_eq!(
            selection
                .as_slice()
                .iter()
                .map(Ticker::as_str)
                .collect::<Vec<_>>(),
            vec!["V", "MA"]
        );
    }

    #[test]
    fn parameters_deserialize_with_default_mode() {
        let params: FilterParameters = serde_json::from_str(
            r#"{"tickers":["aapl"],"start":"2023-01-02","end":"2023-01-03"}"#,
        )
        .expect("deserializes");

        assert!(!params.percent);
        assert!(params.tickers.contains(&Ticker::parse("AAPL").expect("ticker")));
    }
}
