// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by hooks, sinks, and query layers.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::QueryError;

/// Attribute key for the statement verb.
pub const ATTR_OPERATION: &str = "operation";

/// Attribute key for the elapsed time in whole milliseconds.
pub const ATTR_OPERATION_DURATION_MS: &str = "operation_duration_ms";

/// Attribute key for the failure detail. Present only on failed queries.
pub const ATTR_ERROR: &str = "error";

/// Severity tag a record is emitted at.
///
/// Hooks never compare severities with each other; each configured tier is
/// a destination label picked by the classification rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Request-scoped context passed through a hook to its sink.
///
/// Holds the tracing span of the request that issued the query and an
/// optional request id. Hooks pass it along untouched; sinks may use it for
/// correlation.
#[derive(Debug, Clone)]
pub struct QueryContext {
    span: tracing::Span,
    request_id: Option<String>,
}

impl QueryContext {
    /// An empty context with no span and no request id.
    pub fn new() -> Self {
        Self {
            span: tracing::Span::none(),
            request_id: None,
        }
    }

    /// A context bound to the currently entered span.
    pub fn current() -> Self {
        Self {
            span: tracing::Span::current(),
            request_id: None,
        }
    }

    /// A context bound to an explicit span.
    pub fn with_span(span: tracing::Span) -> Self {
        Self {
            span,
            request_id: None,
        }
    }

    /// Attach a request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One completed (or about to run) query execution.
#[derive(Debug, Clone)]
pub struct QueryEvent {
    /// Monotonic timestamp taken when the query began.
    pub start_time: Instant,
    /// Rendered query text.
    pub query: String,
    /// Explicit statement verb. Derived from `query` when `None`.
    pub operation: Option<String>,
    /// Failure, if the query did not succeed.
    pub err: Option<QueryError>,
}

impl QueryEvent {
    /// A new event for `query` starting now.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            query: query.into(),
            operation: None,
            err: None,
        }
    }

    pub fn with_start_time(mut self, start_time: Instant) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_error(mut self, err: QueryError) -> Self {
        self.err = Some(err);
        self
    }

    /// Time elapsed since `start_time`, saturating at zero.
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start_time)
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    /// Rendered error detail.
    Error(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Error(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A named attribute attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: &'static str,
    pub value: AttrValue,
}

impl Attribute {
    pub fn string(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: AttrValue::Str(value.into()),
        }
    }

    pub fn int(key: &'static str, value: i64) -> Self {
        Self {
            key,
            value: AttrValue::Int(value),
        }
    }

    pub fn error(key: &'static str, err: &dyn std::error::Error) -> Self {
        Self {
            key,
            value: AttrValue::Error(err.to_string()),
        }
    }
}

/// A structured record ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub attributes: Vec<Attribute>,
}

impl LogRecord {
    /// Look up an attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| &a.value)
    }

    /// The `operation_duration_ms` attribute, if present.
    pub fn duration_ms(&self) -> Option<i64> {
        match self.attr(ATTR_OPERATION_DURATION_MS) {
            Some(AttrValue::Int(ms)) => Some(*ms),
            _ => None,
        }
    }
}
