// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber setup for hosts that do not install their own.

use querylog_config::LoggingConfig;
use querylog_core::QueryLogError;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(level: &str) -> String {
    format!("querylog={},warn", level.trim().to_ascii_lowercase())
}

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `querylog={level},warn`.
///
/// Returns an error rather than panicking when a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), QueryLogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| QueryLogError::Internal(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_normalizes_level() {
        assert_eq!(default_directive(" DEBUG "), "querylog=debug,warn");
        assert_eq!(default_directive("info"), "querylog=info,warn");
    }
}
