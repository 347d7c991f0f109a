// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query logging hook.
//!
//! [`QueryLogHook`] receives before/after notifications from a query layer
//! and turns every completed query into one structured record:
//!
//! - failed queries are emitted at the error level with an `error` attribute,
//! - successful queries at or above the slow threshold at the slow level,
//! - everything else at the query level.
//!
//! The "no rows" outcome counts as success unless configured otherwise.
//! Records always carry `operation` and `operation_duration_ms` and are
//! emitted through a [`LogSink`]; the default sink is [`TracingSink`].
//!
//! ```
//! use std::time::Duration;
//! use querylog::{HookOption, QueryContext, QueryEvent, QueryHook, QueryLogHook};
//!
//! let hook = QueryLogHook::new([
//!     HookOption::from_env(["QUERYLOG_DEBUG"]),
//!     HookOption::SlowThreshold(Duration::from_millis(100)),
//! ]);
//!
//! let ctx = hook.before_query(QueryContext::current(), &QueryEvent::new("SELECT 1"));
//! hook.after_query(&ctx, &QueryEvent::new("SELECT 1"));
//! ```

pub mod env;
pub mod hook;
pub mod logging;
pub mod operation;
pub mod options;
pub mod sink;

pub use env::{MapEnv, ProcessEnv};
pub use hook::QueryLogHook;
pub use options::{BenignError, DEFAULT_ENV_KEY, HookOption, HookSettings};
pub use sink::TracingSink;

pub use querylog_core::{
    LogRecord, LogSink, QueryContext, QueryError, QueryEvent, QueryHook, QueryLogError, Severity,
};
