// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instrumented SQLite access for querylog.
//!
//! [`InstrumentedDatabase`] wraps a `tokio-rusqlite` connection and reports
//! every statement it runs to the registered [`QueryHook`](querylog_core::QueryHook)s.

pub mod database;

pub use database::{InstrumentedDatabase, NO_PARAMS, query_error};
pub use rusqlite::types::Value;
