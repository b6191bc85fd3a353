use closeview_core::{chart_view, EnvelopeError, SeriesStatus, ViewRequest};
use serde_json::json;

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::{range_warnings, window_request, CommandResult, Context};

pub fn run(args: &ChartArgs, context: &Context<'_>) -> Result<CommandResult, CliError> {
    let request = window_request(&args.window, args.percent)?;
    render(&request, args.flat, context)
}

pub fn render(
    request: &ViewRequest,
    flat: bool,
    context: &Context<'_>,
) -> Result<CommandResult, CliError> {
    let view = chart_view(context.dataset, &context.defaults, request);

    let mut warnings = context.unknown_ticker_warnings(request);
    warnings.extend(range_warnings(view.start, view.end));
    warnings.extend(
        view.series
            .iter()
            .filter(|series| series.status == SeriesStatus::NoData)
            .filter(|series| context.dataset.contains_ticker(&series.ticker))
            .map(|series| format!("no rows for '{}' in the selected range", series.ticker)),
    );

    let errors = view
        .invalid_baselines()
        .iter()
        .map(EnvelopeError::from)
        .collect::<Vec<_>>();

    let row_count = view.point_count();
    let data = if flat {
        json!({
            "mode": view.mode,
            "start": view.start,
            "end": view.end,
            "rows": view.flatten(),
        })
    } else {
        serde_json::to_value(&view)?
    };

    Ok(CommandResult::ok(data, row_count)
        .with_warnings(warnings)
        .with_errors(errors))
}
