//! CLI argument definitions for closeview.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tickers` | Ticker choices, default selection, dataset date bounds |
//! | `chart` | Close or percent-return series per ticker |
//! | `table` | Filtered rows rounded to two decimals |
//! | `stock` | Close history for a single ticker |
//! | `session` | NDJSON request/response loop over stdin |
//!
//! # Examples
//!
//! ```bash
//! closeview --data Datos.csv tickers
//! closeview chart --tickers MA,V --from 2023-01-01 --to 2023-06-30 --percent --pretty
//! closeview table --tickers KO --format table
//! echo '{"view":"chart","tickers":["AAPL"],"percent":true}' | closeview session
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Daily closing-price explorer over a local CSV.
#[derive(Debug, Parser)]
#[command(
    name = "closeview",
    author,
    version,
    about = "Filter daily stock prices and compare closes or percent returns",
    long_about = "closeview loads a CSV of daily prices (Date, Open, High, Low, Close, Volume, \
Ticker) once, then answers chart and table requests for a ticker selection and date range.\n\
\n\
Use 'closeview <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Price CSV. Falls back to $CLOSEVIEW_DATA, then ./Datos.csv.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Tickers selected when a request does not name any (comma separated).
    #[arg(long, global = true, value_delimiter = ',')]
    pub default_tickers: Option<Vec<String>>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format (written to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List ticker choices, the default selection, and the dataset date range.
    Tickers,

    /// Chart series for the selected tickers.
    ///
    /// # Examples
    ///
    ///   closeview chart --tickers MA,V
    ///   closeview chart --tickers AAPL --from 2023-01-02 --to 2023-03-31 --percent
    Chart(ChartArgs),

    /// Filtered rows (Date, Open, High, Low, Close, Volume, Ticker) rounded to cents.
    Table(WindowArgs),

    /// Close history for one ticker.
    Stock(StockArgs),

    /// Read one JSON request per stdin line and answer each with an NDJSON event.
    ///
    /// Request shape: {"view":"chart"|"table"|"stock"|"defaults", ...}.
    Session,
}

/// Ticker selection and date window shared by `chart` and `table`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Tickers to include (comma separated). Omit for the default selection.
    #[arg(long, value_delimiter = ',')]
    pub tickers: Option<Vec<String>>,

    /// First date (inclusive, YYYY-MM-DD). Defaults to the earliest date in the dataset.
    #[arg(long)]
    pub from: Option<String>,

    /// Last date (inclusive, YYYY-MM-DD). Defaults to the latest date in the dataset.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Plot cumulative percent return from each ticker's first close in range.
    #[arg(long, default_value_t = false)]
    pub percent: bool,

    /// Emit flat (date, ticker, value) rows instead of per-ticker series.
    #[arg(long, default_value_t = false)]
    pub flat: bool,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Ticker to chart.
    pub ticker: String,

    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_with_comma_tickers() {
        let cli = Cli::try_parse_from([
            "closeview",
            "--data",
            "prices.csv",
            "chart",
            "--tickers",
            "MA,V",
            "--from",
            "2023-01-02",
            "--percent",
        ])
        .expect("parses");

        assert_eq!(cli.data, Some(PathBuf::from("prices.csv")));
        let Command::Chart(args) = cli.command else {
            panic!("expected chart command");
        };
        assert_eq!(
            args.window.tickers,
            Some(vec![String::from("MA"), String::from("V")])
        );
        assert_eq!(args.window.from.as_deref(), Some("2023-01-02"));
        assert!(args.percent);
        assert!(!args.flat);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["closeview", "tickers", "--format", "table", "--strict"])
            .expect("parses");
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.strict);
        assert!(matches!(cli.command, Command::Tickers));
    }
}
