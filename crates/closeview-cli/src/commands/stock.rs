use closeview_core::{stock_view, Ticker, TradingDate};

use crate::cli::StockArgs;
use crate::error::CliError;

use super::{parse_date, range_warnings, CommandResult, Context};

pub fn run(args: &StockArgs, context: &Context<'_>) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let start = parse_date(args.from.as_deref())?;
    let end = parse_date(args.to.as_deref())?;
    render(ticker, start, end, context)
}

pub fn render(
    ticker: Ticker,
    start: Option<TradingDate>,
    end: Option<TradingDate>,
    context: &Context<'_>,
) -> Result<CommandResult, CliError> {
    let view = stock_view(context.dataset, &context.defaults, ticker, start, end);

    let mut warnings = range_warnings(view.start, view.end);
    if let Some(message) = &view.message {
        warnings.push(format!("{}: {message}", view.ticker));
    }

    let row_count = view.points.len();
    Ok(CommandResult::ok(serde_json::to_value(&view)?, row_count).with_warnings(warnings))
}
