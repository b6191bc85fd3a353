use serde_json::json;

use crate::error::CliError;

use super::{CommandResult, Context};

pub fn run(context: &Context<'_>) -> Result<CommandResult, CliError> {
    let defaults = &context.defaults;
    let mut warnings = Vec::new();
    if defaults.selection.is_empty() {
        warnings.push(String::from(
            "none of the configured default tickers are present in the dataset",
        ));
    }

    let data = json!({
        "choices": defaults.choices,
        "selection": defaults.selection,
        "start": defaults.start,
        "end": defaults.end,
        "records": context.dataset.len(),
    });

    Ok(CommandResult::ok(data, defaults.choices.len()).with_warnings(warnings))
}
