// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The default sink: records become `tracing` events.

use querylog_core::{
    ATTR_ERROR, ATTR_OPERATION, ATTR_OPERATION_DURATION_MS, AttrValue, LogRecord, LogSink,
    QueryContext, QueryLogError, Severity,
};
use tracing::Level;

/// Target every query record is emitted under.
pub const TARGET: &str = "querylog";

/// Emits records as `tracing` events with target `querylog`, inside the
/// span carried by the query context.
///
/// Whatever subscriber the process installed renders and filters them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

/// Known attributes pulled out of a record, borrowed for the event.
struct Fields<'a> {
    operation: &'a str,
    duration_ms: i64,
    error: Option<&'a str>,
    request_id: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(ctx: &'a QueryContext, record: &'a LogRecord) -> Self {
        let mut fields = Fields {
            operation: "",
            duration_ms: 0,
            error: None,
            request_id: ctx.request_id(),
        };
        for attr in &record.attributes {
            match (attr.key, &attr.value) {
                (ATTR_OPERATION, AttrValue::Str(op)) => fields.operation = op.as_str(),
                (ATTR_OPERATION_DURATION_MS, AttrValue::Int(ms)) => fields.duration_ms = *ms,
                (ATTR_ERROR, AttrValue::Error(err) | AttrValue::Str(err)) => {
                    fields.error = Some(err.as_str())
                }
                _ => {}
            }
        }
        fields
    }
}

// `tracing` needs the level as a constant at each callsite.
macro_rules! emit_at {
    ($level:expr, $message:expr, $fields:expr) => {{
        let Fields {
            operation,
            duration_ms,
            error,
            request_id,
        } = $fields;
        match error {
            Some(error) => tracing::event!(
                target: TARGET,
                $level,
                operation,
                operation_duration_ms = duration_ms,
                error,
                request_id,
                "{}",
                $message
            ),
            None => tracing::event!(
                target: TARGET,
                $level,
                operation,
                operation_duration_ms = duration_ms,
                request_id,
                "{}",
                $message
            ),
        }
    }};
}

impl LogSink for TracingSink {
    fn emit(&self, ctx: &QueryContext, record: &LogRecord) -> Result<(), QueryLogError> {
        let fields = Fields::new(ctx, record);
        let message = record.message.as_str();
        ctx.span().in_scope(|| match record.severity {
            Severity::Trace => emit_at!(Level::TRACE, message, fields),
            Severity::Debug => emit_at!(Level::DEBUG, message, fields),
            Severity::Info => emit_at!(Level::INFO, message, fields),
            Severity::Warn => emit_at!(Level::WARN, message, fields),
            Severity::Error => emit_at!(Level::ERROR, message, fields),
        });
        Ok(())
    }
}
