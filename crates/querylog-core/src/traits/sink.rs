// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured logging backend trait.

use crate::error::QueryLogError;
use crate::types::{LogRecord, QueryContext};

/// A structured logging backend records are emitted through.
///
/// Sinks are shared between hooks and threads, so implementations must be
/// safe for concurrent use.
pub trait LogSink: Send + Sync {
    /// Emit one record at `record.severity`.
    fn emit(&self, ctx: &QueryContext, record: &LogRecord) -> Result<(), QueryLogError>;
}
