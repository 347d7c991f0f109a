// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction-time options for [`QueryLogHook`](crate::QueryLogHook).
//!
//! Options are applied in order over the defaults, so a later option wins
//! over an earlier one touching the same setting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use querylog_config::HookConfig;
use querylog_core::{EnvSource, LogSink, QueryError, Severity};

use crate::env::ProcessEnv;
use crate::sink::TracingSink;

/// Variable consulted by [`HookOption::from_env`] when no keys are given.
pub const DEFAULT_ENV_KEY: &str = "QUERYLOG_DEBUG";

/// Matches errors that should be logged as success-like outcomes.
#[derive(Clone)]
pub struct BenignError {
    name: String,
    matcher: Arc<dyn Fn(&QueryError) -> bool + Send + Sync>,
}

impl BenignError {
    /// The "no rows" condition.
    pub fn no_rows() -> Self {
        Self {
            name: "no_rows".to_string(),
            matcher: Arc::new(QueryError::is_no_rows),
        }
    }

    /// Driver errors carrying exactly this code.
    pub fn code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: format!("code:{code}"),
            matcher: Arc::new(move |err: &QueryError| err.code() == Some(code.as_str())),
        }
    }

    /// An arbitrary predicate.
    pub fn when(
        name: impl Into<String>,
        matcher: impl Fn(&QueryError) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Arc::new(matcher),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, err: &QueryError) -> bool {
        (self.matcher)(err)
    }
}

impl fmt::Debug for BenignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BenignError").field(&self.name).finish()
    }
}

/// One configuration mutation applied at hook construction.
pub enum HookOption {
    /// Force the hook on or off.
    Enabled(bool),
    /// Decide `enabled` from the first of `keys` present in `source`:
    /// `""` or `"0"` disables, anything else enables. Left unchanged when
    /// no key is present. Empty `keys` means [`DEFAULT_ENV_KEY`].
    FromEnv {
        source: Arc<dyn EnvSource>,
        keys: Vec<String>,
    },
    QueryLevel(Severity),
    SlowLevel(Severity),
    ErrorLevel(Severity),
    /// Slow query threshold. Zero disables slow query detection.
    SlowThreshold(Duration),
    Sink(Arc<dyn LogSink>),
    /// Add a success-like error matcher.
    BenignError(BenignError),
    /// Replace the whole success-like set. An empty list makes every error,
    /// "no rows" included, a failure.
    BenignErrors(Vec<BenignError>),
}

impl HookOption {
    /// [`HookOption::FromEnv`] against the process environment.
    pub fn from_env<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_env_source(Arc::new(ProcessEnv), keys)
    }

    /// [`HookOption::FromEnv`] against any key-value source.
    pub fn from_env_source<I, S>(source: Arc<dyn EnvSource>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FromEnv {
            source,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Options equivalent to a `[hook]` config section, reading
    /// `enabled_env` from the process environment.
    pub fn from_config(config: &HookConfig) -> Vec<HookOption> {
        Self::from_config_with_env(config, Arc::new(ProcessEnv))
    }

    /// Options equivalent to a `[hook]` config section, reading
    /// `enabled_env` from `source`.
    pub fn from_config_with_env(
        config: &HookConfig,
        source: Arc<dyn EnvSource>,
    ) -> Vec<HookOption> {
        let mut options = vec![HookOption::Enabled(config.enabled)];
        if !config.enabled_env.is_empty() {
            options.push(HookOption::FromEnv {
                source,
                keys: config.enabled_env.clone(),
            });
        }
        options.extend([
            HookOption::QueryLevel(config.query_level),
            HookOption::SlowLevel(config.slow_level),
            HookOption::ErrorLevel(config.error_level),
            HookOption::SlowThreshold(config.slow_threshold()),
        ]);
        options.extend(
            config
                .benign_error_codes
                .iter()
                .map(|code| HookOption::BenignError(BenignError::code(code.trim()))),
        );
        options
    }
}

/// Resolve the enable switch from `keys` (first present wins).
///
/// Returns `None` when none of the keys is present.
pub fn enabled_from_env(source: &dyn EnvSource, keys: &[String]) -> Option<bool> {
    let value = if keys.is_empty() {
        source.lookup(DEFAULT_ENV_KEY)
    } else {
        keys.iter().find_map(|key| source.lookup(key))
    };
    value.map(|v| !v.is_empty() && v != "0")
}

/// The resolved, immutable settings of a hook.
#[derive(Clone)]
pub struct HookSettings {
    pub enabled: bool,
    pub query_level: Severity,
    pub slow_level: Severity,
    pub error_level: Severity,
    pub slow_threshold: Duration,
    pub sink: Arc<dyn LogSink>,
    pub benign_errors: Vec<BenignError>,
}

impl HookSettings {
    pub(crate) fn apply(&mut self, option: HookOption) {
        match option {
            HookOption::Enabled(on) => self.enabled = on,
            HookOption::FromEnv { source, keys } => {
                if let Some(on) = enabled_from_env(source.as_ref(), &keys) {
                    self.enabled = on;
                }
            }
            HookOption::QueryLevel(level) => self.query_level = level,
            HookOption::SlowLevel(level) => self.slow_level = level,
            HookOption::ErrorLevel(level) => self.error_level = level,
            HookOption::SlowThreshold(threshold) => self.slow_threshold = threshold,
            HookOption::Sink(sink) => self.sink = sink,
            HookOption::BenignError(benign) => self.benign_errors.push(benign),
            HookOption::BenignErrors(benign) => self.benign_errors = benign,
        }
    }

    /// Whether `err` counts as a success-like outcome.
    pub fn is_benign(&self, err: &QueryError) -> bool {
        self.benign_errors.iter().any(|b| b.matches(err))
    }
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            query_level: Severity::Debug,
            slow_level: Severity::Warn,
            error_level: Severity::Error,
            slow_threshold: Duration::ZERO,
            sink: Arc::new(TracingSink),
            benign_errors: vec![BenignError::no_rows()],
        }
    }
}

impl fmt::Debug for HookSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSettings")
            .field("enabled", &self.enabled)
            .field("query_level", &self.query_level)
            .field("slow_level", &self.slow_level)
            .field("error_level", &self.error_level)
            .field("slow_threshold", &self.slow_threshold)
            .field("benign_errors", &self.benign_errors)
            .finish_non_exhaustive()
    }
}
