// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as usable environment variable names and known log levels.

use std::collections::HashSet;
use std::str::FromStr;

use querylog_core::Severity;

use crate::diagnostic::ConfigError;
use crate::model::QueryLogConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QueryLogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Env variable names must be non-empty and settable
    let mut seen_env = HashSet::new();
    for (i, key) in config.hook.enabled_env.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("hook.enabled_env[{i}] must not be empty"),
            });
        } else if key.contains('=') || key.contains('\0') {
            errors.push(ConfigError::Validation {
                message: format!(
                    "hook.enabled_env[{i}] `{key}` is not a valid environment variable name"
                ),
            });
        } else if !seen_env.insert(key.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate environment variable `{key}` in hook.enabled_env"),
            });
        }
    }

    for (i, code) in config.hook.benign_error_codes.iter().enumerate() {
        if code.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("hook.benign_error_codes[{i}] must not be empty"),
            });
        }
    }

    if Severity::from_str(config.logging.level.trim()).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
