use closeview_core::{table_view, ViewRequest};

use crate::cli::WindowArgs;
use crate::error::CliError;

use super::{range_warnings, window_request, CommandResult, Context};

pub fn run(args: &WindowArgs, context: &Context<'_>) -> Result<CommandResult, CliError> {
    let request = window_request(args, false)?;
    render(&request, context)
}

pub fn render(request: &ViewRequest, context: &Context<'_>) -> Result<CommandResult, CliError> {
    let view = table_view(context.dataset, &context.defaults, request);

    let mut warnings = context.unknown_ticker_warnings(request);
    warnings.extend(range_warnings(view.start, view.end));

    let row_count = view.rows.len();
    Ok(CommandResult::ok(serde_json::to_value(&view)?, row_count).with_warnings(warnings))
}
