//! Render-boundary payloads: chart series, rounded table rows, and the
//! single-ticker stock chart.
//!
//! Every view is a pure function of the dataset and a [`ViewRequest`]; calling
//! it again with new parameters is the whole recomputation model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{debug, warn};

use crate::filter::{filter, group_by_ticker, table_order, FilterParameters, TickerSelection};
use crate::palette::color_for;
use crate::returns::{to_percent_return, SeriesPoint};
use crate::{DashboardConfig, Dataset, InvalidBaselineError, PriceRecord, Ticker, TradingDate};

/// Message carried by an empty stock view.
pub const NO_DATA_MESSAGE: &str = "no data available for the selected range";

/// Initial control state derived from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDefaults {
    /// Every ticker in the dataset, sorted.
    pub choices: Vec<Ticker>,
    /// Configured default selection restricted to tickers that exist.
    pub selection: TickerSelection,
    pub start: Option<TradingDate>,
    pub end: Option<TradingDate>,
}

impl DashboardDefaults {
    pub fn from_dataset(dataset: &Dataset, config: &DashboardConfig) -> Self {
        let choices = dataset.tickers();
        let selection = config
            .default_selection
            .iter()
            .filter(|ticker| choices.binary_search(ticker).is_ok())
            .cloned()
            .collect();
        let bounds = dataset.date_bounds();

        Self {
            choices,
            selection,
            start: bounds.map(|(first, _)| first),
            end: bounds.map(|(_, last)| last),
        }
    }
}

/// One interaction from the controls. Missing fields fall back to [`DashboardDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// `None` means "use the default selection"; an empty list selects nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickers: Option<TickerSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<TradingDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<TradingDate>,
    #[serde(default)]
    pub percent: bool,
}

impl ViewRequest {
    /// Fill gaps from the defaults and produce the filter parameters.
    pub fn resolve(&self, defaults: &DashboardDefaults) -> (TickerSelection, FilterParameters) {
        let selection = self
            .tickers
            .clone()
            .unwrap_or_else(|| defaults.selection.clone());
        let start = self
            .start
            .or(defaults.start)
            .unwrap_or_else(|| TradingDate::from(Date::MIN));
        let end = self
            .end
            .or(defaults.end)
            .unwrap_or_else(|| TradingDate::from(Date::MAX));

        let params = FilterParameters::new(selection.as_slice().iter().cloned(), start, end)
            .with_percent(self.percent);
        (selection, params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    Close,
    PercentReturn,
}

/// Why a series does or does not carry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesStatus {
    Ok,
    /// Ticker unknown, or no rows inside the range.
    NoData,
    /// Percent mode with a zero first close on `date`.
    InvalidBaseline { date: TradingDate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub ticker: Ticker,
    pub color: String,
    #[serde(flatten)]
    pub status: SeriesStatus,
    pub points: Vec<SeriesPoint>,
}

/// Flat `(date, ticker, value)` tuple for renderers that want one long table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub date: TradingDate,
    pub ticker: Ticker,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub mode: ChartMode,
    pub start: TradingDate,
    pub end: TradingDate,
    pub series: Vec<ChartSeries>,
}

impl ChartView {
    /// All points as tuples, ordered by date then ticker.
    pub fn flatten(&self) -> Vec<ChartRow> {
        let mut rows = self
            .series
            .iter()
            .flat_map(|series| {
                series.points.iter().map(|point| ChartRow {
                    date: point.date,
                    ticker: series.ticker.clone(),
                    value: point.value,
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));
        rows
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    pub fn invalid_baselines(&self) -> Vec<InvalidBaselineError> {
        self.series
            .iter()
            .filter_map(|series| match series.status {
                SeriesStatus::InvalidBaseline { date } => Some(InvalidBaselineError {
                    ticker: series.ticker.clone(),
                    date,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Chart payload: one series per selected ticker, in selection order.
pub fn chart_view(dataset: &Dataset, defaults: &DashboardDefaults, request: &ViewRequest) -> ChartView {
    let (selection, params) = request.resolve(defaults);
    let rows = filter(dataset, &params);
    let mut groups = group_by_ticker(&rows).into_iter().collect::<BTreeMap<_, _>>();

    let series = selection
        .as_slice()
        .iter()
        .map(|ticker| {
            let group = groups.remove(ticker).unwrap_or_default();
            build_series(ticker, &group, params.percent)
        })
        .collect::<Vec<_>>();

    debug!(
        series = series.len(),
        rows = rows.len(),
        percent = params.percent,
        "chart view recomputed"
    );

    ChartView {
        mode: if params.percent {
            ChartMode::PercentReturn
        } else {
            ChartMode::Close
        },
        start: params.start,
        end: params.end,
        series,
    }
}

fn build_series(ticker: &Ticker, group: &[&PriceRecord], percent: bool) -> ChartSeries {
    let color = color_for(ticker).to_owned();
    if group.is_empty() {
        return ChartSeries {
            ticker: ticker.clone(),
            color,
            status: SeriesStatus::NoData,
            points: Vec::new(),
        };
    }

    if !percent {
        return ChartSeries {
            ticker: ticker.clone(),
            color,
            status: SeriesStatus::Ok,
            points: close_points(group),
        };
    }

    match to_percent_return(group) {
        Ok(points) => ChartSeries {
            ticker: ticker.clone(),
            color,
            status: SeriesStatus::Ok,
            points,
        },
        Err(error) => {
            warn!(%error, "series dropped from percent chart");
            ChartSeries {
                ticker: ticker.clone(),
                color,
                status: SeriesStatus::InvalidBaseline { date: error.date },
                points: Vec::new(),
            }
        }
    }
}

fn close_points(group: &[&PriceRecord]) -> Vec<SeriesPoint> {
    group
        .iter()
        .map(|record| SeriesPoint {
            date: record.date,
            value: record.close,
        })
        .collect()
}

/// One table row with prices rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub ticker: Ticker,
}

impl From<&PriceRecord> for TableRow {
    fn from(record: &PriceRecord) -> Self {
        Self {
            date: record.date,
            open: round2(record.open),
            high: round2(record.high),
            low: round2(record.low),
            close: round2(record.close),
            volume: record.volume,
            ticker: record.ticker.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub start: TradingDate,
    pub end: TradingDate,
    pub rows: Vec<TableRow>,
}

/// Tabular payload, ordered by ticker then date. Percent mode does not apply.
pub fn table_view(dataset: &Dataset, defaults: &DashboardDefaults, request: &ViewRequest) -> TableView {
    let (_, params) = request.resolve(defaults);
    let rows = table_order(&filter(dataset, &params))
        .into_iter()
        .map(TableRow::from)
        .collect();

    TableView {
        start: params.start,
        end: params.end,
        rows,
    }
}

/// Single-ticker close chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockView {
    pub ticker: Ticker,
    pub title: String,
    pub start: TradingDate,
    pub end: TradingDate,
    pub points: Vec<SeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn stock_view(
    dataset: &Dataset,
    defaults: &DashboardDefaults,
    ticker: Ticker,
    start: Option<TradingDate>,
    end: Option<TradingDate>,
) -> StockView {
    let request = ViewRequest {
        tickers: Some(TickerSelection::new([ticker.clone()])),
        start,
        end,
        percent: false,
    };
    let (_, params) = request.resolve(defaults);
    let rows = filter(dataset, &params);
    let points = close_points(&rows);

    let (title, message) = if points.is_empty() {
        (String::from(NO_DATA_MESSAGE), Some(String::from(NO_DATA_MESSAGE)))
    } else {
        (format!("closing price history for {ticker}"), None)
    };

    StockView {
        ticker,
        title,
        start: params.start,
        end: params.end,
        points,
        message,
    }
}

fn round2(value: f64) -> f64 {
    let cents = value * 100.0;
    // Past this magnitude there are no cents left to round.
    if !cents.is_finite() {
        return value;
    }
    cents.round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, date: &str, close: f64) -> PriceRecord {
        PriceRecord::new(
            Ticker::parse(ticker).expect("ticker"),
            TradingDate::parse(date).expect("date"),
            close + 0.004,
            close + 1.006,
            close - 1.0,
            close,
            1_000,
        )
        .expect("record")
    }

    fn date(value: &str) -> TradingDate {
        TradingDate::parse(value).expect("date")
    }

    fn selection(values: &[&str]) -> TickerSelection {
        values
            .iter()
            .map(|value| Ticker::parse(value).expect("ticker"))
            .collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("MA", "2023-01-03", 350.0),
            record("MA", "2023-01-04", 357.0),
            record("V", "2023-01-03", 210.0),
            record("V", "2023-01-04", 199.5),
            record("KO", "2023-01-04", 63.0),
        ])
    }

    fn defaults(dataset: &Dataset) -> DashboardDefaults {
        DashboardDefaults::from_dataset(dataset, &DashboardConfig::default())
    }

    #[test]
    fn defaults_cover_full_range_and_known_selection() {
        let dataset = dataset();
        let defaults = defaults(&dataset);

        assert_eq!(defaults.choices.len(), 3);
        assert_eq!(defaults.selection, selection(&["MA", "V"]));
        assert_eq!(defaults.start, Some(date("2023-01-03")));
        assert_eq!(defaults.end, Some(date("2023-01-04")));
    }

    #[test]
    fn default_selection_drops_absent_tickers() {
        let dataset = Dataset::from_records(vec![record("V", "2023-01-03", 210.0)]);
        let defaults = defaults(&dataset);
        assert_eq!(defaults.selection, selection(&["V"]));
    }

    #[test]
    fn chart_follows_selection_order_and_marks_missing() {
        let dataset = dataset();
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(selection(&["V", "ZZZ", "MA"])),
            ..ViewRequest::default()
        };

        let view = chart_view(&dataset, &defaults, &request);

        assert_eq!(view.mode, ChartMode::Close);
        let tickers = view
            .series
            .iter()
            .map(|series| series.ticker.as_str())
            .collect::<Vec<_>>();
        assert_eq!(tickers, vec!["V", "ZZZ", "MA"]);
        assert_eq!(view.series[0].status, SeriesStatus::Ok);
        assert_eq!(view.series[0].color, "#4FC3F7");
        assert_eq!(view.series[1].status, SeriesStatus::NoData);
        assert!(view.series[1].points.is_empty());
        assert_eq!(view.point_count(), 4);
    }

    #[test]
    fn percent_chart_rebases_inside_range() {
        let dataset = dataset();
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(selection(&["MA"])),
            start: Some(date("2023-01-04")),
            end: None,
            percent: true,
        };

        let view = chart_view(&dataset, &defaults, &request);

        assert_eq!(view.mode, ChartMode::PercentReturn);
        assert_eq!(view.series[0].points.len(), 1);
        assert_eq!(view.series[0].points[0].value, 0.0);
    }

    #[test]
    fn zero_baseline_becomes_visible_status() {
        let dataset = Dataset::from_records(vec![
            PriceRecord::new(
                Ticker::parse("F").expect("ticker"),
                date("2023-01-03"),
                0.0,
                0.0,
                0.0,
                0.0,
                0,
            )
            .expect("record"),
            record("F", "2023-01-04", 12.0),
            record("V", "2023-01-03", 210.0),
        ]);
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(selection(&["F", "V"])),
            percent: true,
            ..ViewRequest::default()
        };

        let view = chart_view(&dataset, &defaults, &request);

        assert_eq!(
            view.series[0].status,
            SeriesStatus::InvalidBaseline {
                date: date("2023-01-03")
            }
        );
        assert!(view.series[0].points.is_empty());
        assert_eq!(view.series[1].status, SeriesStatus::Ok);
        assert_eq!(view.invalid_baselines().len(), 1);
    }

    #[test]
    fn flatten_orders_by_date_then_ticker() {
        let dataset = dataset();
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(selection(&["V", "MA"])),
            ..ViewRequest::default()
        };

        let rows = chart_view(&dataset, &defaults, &request).flatten();
        let labels = rows
            .iter()
            .map(|row| format!("{}:{}", row.date, row.ticker))
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
    fn table_rounds_prices_and_orders_by_ticker() {
        let dataset = dataset();
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(selection(&["V", "KO"])),
            ..ViewRequest::default()
        };

        let table = table_view(&dataset, &defaults, &request);

        let labels = table
            .rows
            .iter()
            .map(|row| format!("{}:{}", row.ticker, row.date))
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["KO:2023-01-04", "V:2023-01-03", "V:2023-01-04"]);
        assert_eq!(table.rows[0].open, 63.0);
        assert_eq!(table.rows[0].high, 64.01);
        assert_eq!(table.rows[0].volume, 1_000);
    }

    #[test]
    fn rounding_keeps_extreme_prices_finite() {
        assert_eq!(round2(f64::MAX), f64::MAX);
        assert!(round2(f64::MAX / 2.0).is_finite());
        assert_eq!(round2(12.3456), 12.35);
    }

    #[test]
    fn empty_selection_gives_empty_table() {
        let dataset = dataset();
        let defaults = defaults(&dataset);
        let request = ViewRequest {
            tickers: Some(TickerSelection::default()),
            ..ViewRequest::default()
        };

        assert!(table_view(&dataset, &defaults, &request).rows.is_empty());
        assert!(chart_view(&dataset, &defaults, &request).series.is_empty());
    }

    #[test]
    fn stock_view_reports_missing_data() {
        let dataset = dataset();
        let defaults = defaults(&dataset);

        let present = stock_view(&dataset, &defaults, Ticker::parse("KO").expect("ticker"), None, None);
        assert_eq!(present.points.len(), 1);
        assert!(present.message.is_none());
        assert!(present.title.contains("KO"));

        let missing = stock_view(
            &dataset,
            &defaults,
            Ticker::parse("KO").expect("ticker"),
            Some(date("2023-01-03")),
            Some(date("2023-01-03")),
        );
        assert!(missing.points.is_empty());
        assert_eq!(missing.message.as_deref(), Some(NO_DATA_MESSAGE));
    }
}
