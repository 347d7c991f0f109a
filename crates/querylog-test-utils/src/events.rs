// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event builders with controlled timing.

use std::time::{Duration, Instant};

use querylog_core::{QueryError, QueryEvent};

/// An event for `query` whose start lies `elapsed` in the past.
///
/// Falls back to "now" when the monotonic clock cannot go back that far.
pub fn event_started_ago(query: &str, elapsed: Duration) -> QueryEvent {
    let start = Instant::now().checked_sub(elapsed).unwrap_or_else(Instant::now);
    QueryEvent::new(query).with_start_time(start)
}

/// A just-started event that failed with a driver error.
pub fn failed_event(query: &str, message: &str) -> QueryEvent {
    QueryEvent::new(query).with_error(QueryError::driver(message))
}

/// A just-started lookup that matched no rows.
pub fn no_rows_event(query: &str) -> QueryEvent {
    QueryEvent::new(query).with_error(QueryError::NoRows)
}
