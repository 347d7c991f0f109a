// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the querylog query logging hook.
//!
//! This crate provides the trait seams, error types, and event/record types
//! shared by the hook, its sinks, and the query layers that fire it.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{QueryError, QueryLogError};
pub use types::{
    ATTR_ERROR, ATTR_OPERATION, ATTR_OPERATION_DURATION_MS, AttrValue, Attribute, LogRecord,
    QueryContext, QueryEvent, Severity,
};

pub use traits::{EnvSource, LogSink, QueryHook};
