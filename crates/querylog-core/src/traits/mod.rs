// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between query layers, hooks, sinks, and configuration sources.
//!
//! All traits are synchronous and object safe so they can be shared behind
//! `Arc<dyn ...>` across threads.

pub mod env;
pub mod hook;
pub mod sink;

pub use env::EnvSource;
pub use hook::QueryHook;
pub use sink::LogSink;
