// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value lookup used for environment-driven configuration.

/// A read-only key-value store consulted once at hook construction.
pub trait EnvSource: Send + Sync {
    /// Returns the value for `key`, or `None` when the key is absent.
    ///
    /// An empty string is a present value, distinct from absence.
    fn lookup(&self, key: &str) -> Option<String>;
}
