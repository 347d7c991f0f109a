// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for querylog.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use querylog_core::Severity;
use serde::{Deserialize, Serialize};

/// Top-level querylog configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryLogConfig {
    /// Query hook classification settings.
    #[serde(default)]
    pub hook: HookConfig,

    /// Log subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Query hook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    /// Whether the hook emits records at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Environment variables consulted (first present wins) to override `enabled`.
    /// Empty means the environment is not consulted.
    #[serde(default)]
    pub enabled_env: Vec<String>,

    /// Severity for ordinary successful queries.
    #[serde(default = "default_query_level")]
    pub query_level: Severity,

    /// Severity for successful queries at or above the slow threshold.
    #[serde(default = "default_slow_level")]
    pub slow_level: Severity,

    /// Severity for failed queries.
    #[serde(default = "default_error_level")]
    pub error_level: Severity,

    /// Slow query threshold in milliseconds. 0 disables slow query detection.
    #[serde(default)]
    pub slow_threshold_ms: u64,

    /// Driver error codes treated as success-like in addition to "no rows".
    #[serde(default)]
    pub benign_error_codes: Vec<String>,
}

impl HookConfig {
    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            enabled_env: Vec::new(),
            query_level: default_query_level(),
            slow_level: default_slow_level(),
            error_level: default_error_level(),
            slow_threshold_ms: 0,
            benign_error_codes: Vec::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_query_level() -> Severity {
    Severity::Debug
}

fn default_slow_level() -> Severity {
    Severity::Warn
}

fn default_error_level() -> Severity {
    Severity::Error
}

/// Log subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_defaults_match_documented_values() {
        let hook = HookConfig::default();
        assert!(hook.enabled);
        assert!(hook.enabled_env.is_empty());
        assert_eq!(hook.query_level, Severity::Debug);
        assert_eq!(hook.slow_level, Severity::Warn);
        assert_eq!(hook.error_level, Severity::Error);
        assert_eq!(hook.slow_threshold(), Duration::ZERO);
        assert!(hook.benign_error_codes.is_empty());
    }

    #[test]
    fn slow_threshold_converts_milliseconds() {
        let hook = HookConfig {
            slow_threshold_ms: 250,
            ..HookConfig::default()
        };
        assert_eq!(hook.slow_threshold(), Duration::from_millis(250));
    }
}
