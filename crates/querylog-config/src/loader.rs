// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./querylog.toml` >
//! `~/.config/querylog/querylog.toml` > `/etc/querylog/querylog.toml`, with
//! environment variable overrides via the `QUERYLOG_HOOK_` and
//! `QUERYLOG_LOGGING_` prefixes.

// figment::Error is external and cannot be boxed without a wrapper
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QueryLogConfig;

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/querylog/querylog.toml";

/// Name of the local and per-user config file.
pub const CONFIG_FILE_NAME: &str = "querylog.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/querylog/querylog.toml` (system-wide)
/// 3. `~/.config/querylog/querylog.toml` (user XDG config)
/// 4. `./querylog.toml` (local directory)
/// 5. `QUERYLOG_HOOK_*` and `QUERYLOG_LOGGING_*` environment variables
pub fn load_config() -> Result<QueryLogConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<QueryLogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QueryLogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QueryLogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QueryLogConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QueryLogConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// The per-user config file under the XDG config directory, if one is known.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("querylog").join(CONFIG_FILE_NAME))
}

/// Create the environment variable provider.
///
/// Only `hook_*` and `logging_*` keys are taken so that unrelated
/// `QUERYLOG_*` variables (such as the hook's own enable switch,
/// `QUERYLOG_DEBUG`) never trip `deny_unknown_fields`. Uses `map()` rather
/// than `split("_")` because field names contain underscores:
/// `QUERYLOG_HOOK_SLOW_THRESHOLD_MS` must map to `hook.slow_threshold_ms`.
fn env_provider() -> Env {
    Env::prefixed("QUERYLOG_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            key.starts_with("hook_") || key.starts_with("logging_")
        })
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("hook_", "hook.", 1)
                .replacen("logging_", "logging.", 1)
                .into()
        })
}
