// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for querylog tests.
//!
//! # Components
//!
//! - [`RecordingSink`] - captures emitted records for assertion
//! - [`FailingSink`] - rejects every record
//! - [`RecordingHook`] - records before/after notifications from a query layer
//! - [`events`] - query events with controlled timing and outcome

pub mod events;
pub mod mock_hook;
pub mod mock_sink;

pub use events::{event_started_ago, failed_event, no_rows_event};
pub use mock_hook::{HookCall, RecordingHook};
pub use mock_sink::{CapturedRecord, FailingSink, RecordingSink};
