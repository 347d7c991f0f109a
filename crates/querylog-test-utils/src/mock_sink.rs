// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock sinks for deterministic testing.
//!
//! `RecordingSink` captures every emitted record for assertion;
//! `FailingSink` rejects every record and counts the attempts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use querylog_core::{LogRecord, LogSink, QueryContext, QueryLogError, Severity};

/// A record captured by [`RecordingSink`], with the request id of the
/// context it was emitted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub record: LogRecord,
    pub request_id: Option<String>,
}

/// A sink that keeps every record in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a hook and
/// inspect another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured records, in emission order.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of captured records.
    pub fn count(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Severities of captured records, in emission order.
    pub fn severities(&self) -> Vec<Severity> {
        self.records()
            .into_iter()
            .map(|c| c.record.severity)
            .collect()
    }

    /// The only captured record. Panics unless exactly one was emitted.
    pub fn single(&self) -> LogRecord {
        let records = self.records();
        assert_eq!(
            records.len(),
            1,
            "expected exactly one record, got {records:?}"
        );
        records[0].record.clone()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, ctx: &QueryContext, record: &LogRecord) -> Result<(), QueryLogError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedRecord {
                record: record.clone(),
                request_id: ctx.request_id().map(str::to_string),
            });
        Ok(())
    }
}

/// A sink whose every emit fails.
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of emit calls received.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl LogSink for FailingSink {
    fn emit(&self, _ctx: &QueryContext, _record: &LogRecord) -> Result<(), QueryLogError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(QueryLogError::Sink {
            message: "sink unavailable".into(),
            source: Some(Box::new(std::io::Error::other("broken pipe"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            severity: Severity::Info,
            message: message.into(),
            attributes: Vec::new(),
        }
    }

    #[test]
    fn recording_sink_shares_buffer_between_clones() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.emit(&QueryContext::new().with_request_id("r1"), &record("a"))
            .unwrap();

        assert_eq!(handle.count(), 1);
        assert_eq!(handle.records()[0].request_id.as_deref(), Some("r1"));
        assert_eq!(handle.single().message, "a");

        handle.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn failing_sink_counts_attempts() {
        let sink = FailingSink::new();
        assert!(sink.emit(&QueryContext::new(), &record("a")).is_err());
        assert!(sink.emit(&QueryContext::new(), &record("b")).is_err());
        assert_eq!(sink.attempts(), 2);
    }
}
