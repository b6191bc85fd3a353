//! NDJSON transcript of a `session` run.
//!
//! Each line is one [`SessionEvent`] stamped with a sequence number and the
//! time it was written. A transcript always opens with `start` and, unless
//! stdin itself fails, closes with `end`.

use std::io::Write;

use closeview_core::{DashboardDefaults, Envelope, UtcDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Why a request line produced no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Bytes on the line are not UTF-8.
    InvalidEncoding,
    /// Line is not a recognised JSON request.
    InvalidRequest,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent<'a> {
    Start {
        dataset: &'a str,
        records: usize,
        trace_id: &'a str,
        defaults: &'a DashboardDefaults,
    },
    Answer {
        line: usize,
        envelope: Envelope<Value>,
    },
    Error {
        line: usize,
        code: RejectReason,
        message: String,
    },
    End {
        answered: usize,
        rejected: usize,
    },
}

#[derive(Debug, Serialize)]
struct Stamped<'e, 'a> {
    seq: u64,
    ts: UtcDateTime,
    #[serde(flatten)]
    event: &'e SessionEvent<'a>,
}

/// Writes session events one per line, flushing so a reader sees each answer immediately.
pub struct TranscriptWriter<W: Write> {
    writer: W,
    next_seq: u64,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
        }
    }

    pub fn write(&mut self, event: &SessionEvent<'_>) -> Result<(), CliError> {
        let stamped = Stamped {
            seq: self.next_seq,
            ts: UtcDateTime::now(),
            event,
        };
        serde_json::to_writer(&mut self.writer, &stamped)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.next_seq += 1;
        Ok(())
    }
}
