//! Request/response loop: one JSON interaction per input line, one NDJSON
//! event for each line answered or rejected.
//!
//! Every request is recomputed from scratch against the same loaded dataset;
//! nothing carries over between lines.

use std::io::{BufRead, Write};
use std::time::Instant;

use closeview_core::{Ticker, TradingDate, ViewRequest};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CliError;
use crate::output::transcript::{RejectReason, SessionEvent, TranscriptWriter};

use super::{chart, stock, table, tickers, CommandResult, Context};

/// One interaction, tagged by the view it asks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SessionRequest {
    Defaults,
    Chart(ViewRequest),
    Table(ViewRequest),
    Stock {
        ticker: Ticker,
        #[serde(default)]
        start: Option<TradingDate>,
        #[serde(default)]
        end: Option<TradingDate>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub rejected: usize,
}

pub fn run<R, W>(input: R, output: W, context: &Context<'_>) -> Result<SessionSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut transcript = TranscriptWriter::new(output);
    transcript.write(&SessionEvent::Start {
        dataset: context.dataset.source(),
        records: context.dataset.len(),
        trace_id: context.trace_id.as_str(),
        defaults: &context.defaults,
    })?;

    let mut summary = SessionSummary::default();
    // Split on raw bytes: a bad line is rejected, only a failing reader ends the session.
    for (index, bytes) in input.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = index + 1;

        let event = match parse_line(&bytes) {
            Ok(None) => continue,
            Ok(Some(request)) => {
                let started = Instant::now();
                let result = answer(request, context)?;
                summary.answered += 1;
                SessionEvent::Answer {
                    line,
                    envelope: context.envelope(result, started)?,
                }
            }
            Err((code, message)) => {
                warn!(line, ?code, %message, "rejected session request");
                summary.rejected += 1;
                SessionEvent::Error {
                    line,
                    code,
                    message,
                }
            }
        };
        transcript.write(&event)?;
    }

    info!(
        answered = summary.answered,
        rejected = summary.rejected,
        "session closed"
    );
    transcript.write(&SessionEvent::End {
        answered: summary.answered,
        rejected: summary.rejected,
    })?;

    Ok(summary)
}

/// `Ok(None)` for a blank line.
fn parse_line(bytes: &[u8]) -> Result<Option<SessionRequest>, (RejectReason, String)> {
    let text = std::str::from_utf8(bytes)
        .map_err(|error| (RejectReason::InvalidEncoding, error.to_string()))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|error| (RejectReason::InvalidRequest, error.to_string()))
}

fn answer(request: SessionRequest, context: &Context<'_>) -> Result<CommandResult, CliError> {
    match request {
        SessionRequest::Defaults => tickers::run(context),
        SessionRequest::Chart(request) => chart::render(&request, false, context),
        SessionRequest::Table(request) => table::render(&request, context),
        SessionRequest::Stock { ticker, start, end } => stock::render(ticker, start, end, context),
    }
}
