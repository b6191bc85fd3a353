mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use closeview_core::{DashboardConfig, Dataset};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;
use crate::logging::LogConfig;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::new(cli.log_format, cli.log_level.as_str()));

    let mut config = DashboardConfig::with_data_path(cli.data.clone());
    if let Some(tickers) = &cli.default_tickers {
        config = config.with_default_selection(tickers)?;
    }

    // Loaded once; every command below only borrows it.
    let dataset = Dataset::load(&config.data_path)?;
    let context = Context::new(&dataset, &config);

    if matches!(cli.command, Command::Session) {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let summary = commands::session::run(stdin.lock(), stdout.lock(), &context)?;
        info!(answered = summary.answered, "session finished");
        return Ok(ExitCode::SUCCESS);
    }

    let envelope = commands::run(&cli, &context)?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if !envelope.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
