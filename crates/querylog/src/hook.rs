// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query hook: classifies completed queries and emits one record each.

use std::time::Duration;

use querylog_config::{ConfigError, HookConfig};
use querylog_core::{
    ATTR_ERROR, ATTR_OPERATION, ATTR_OPERATION_DURATION_MS, Attribute, LogRecord, QueryContext,
    QueryError, QueryEvent, QueryHook, QueryLogError, Severity,
};
use tracing::{debug, trace};

use crate::operation;
use crate::options::{HookOption, HookSettings};

/// Turns query events into structured log records.
///
/// Settings are fixed at construction; the hook holds no mutable state and
/// can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use querylog::{HookOption, QueryLogHook, Severity};
///
/// let hook = QueryLogHook::new([
///     HookOption::from_env(["APP_SQL_DEBUG"]),
///     HookOption::SlowThreshold(Duration::from_millis(200)),
///     HookOption::SlowLevel(Severity::Warn),
/// ]);
/// assert_eq!(hook.classify(Duration::from_millis(250), None), Severity::Warn);
/// ```
#[derive(Debug, Clone)]
pub struct QueryLogHook {
    settings: HookSettings,
}

impl QueryLogHook {
    /// Build a hook by applying `options` in order over the defaults.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = HookOption>,
    {
        let mut settings = HookSettings::default();
        for option in options {
            settings.apply(option);
        }

        debug!(
            enabled = settings.enabled,
            query_level = %settings.query_level,
            slow_level = %settings.slow_level,
            error_level = %settings.error_level,
            slow_threshold_ms = duration_ms(settings.slow_threshold),
            benign_errors = settings.benign_errors.len(),
            "query log hook configured"
        );

        Self { settings }
    }

    /// Build a hook from a `[hook]` config section.
    pub fn from_config(config: &HookConfig) -> Self {
        Self::new(HookOption::from_config(config))
    }

    /// Build a hook from the `[hook]` section of the standard config file
    /// hierarchy, after validation.
    pub fn load() -> Result<Self, QueryLogError> {
        let config = querylog_config::load_and_validate().map_err(config_error)?;
        Ok(Self::from_config(&config.hook))
    }

    /// Build a hook from the `[hook]` section of a TOML document, after
    /// validation.
    pub fn from_toml(toml: &str) -> Result<Self, QueryLogError> {
        let config = querylog_config::load_and_validate_str(toml).map_err(config_error)?;
        Ok(Self::from_config(&config.hook))
    }

    pub fn settings(&self) -> &HookSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// The failure an error represents, or `None` for success-like outcomes.
    fn failure<'e>(&self, err: Option<&'e QueryError>) -> Option<&'e QueryError> {
        err.filter(|e| !self.settings.is_benign(e))
    }

    /// Pick the severity for a query that took `elapsed` and ended with `err`.
    pub fn classify(&self, elapsed: Duration, err: Option<&QueryError>) -> Severity {
        let s = &self.settings;
        if self.failure(err).is_some() {
            s.error_level
        } else if !s.slow_threshold.is_zero() && elapsed >= s.slow_threshold {
            s.slow_level
        } else {
            s.query_level
        }
    }

    /// Build the record for `event`, given the time it took.
    pub fn build_record(&self, event: &QueryEvent, elapsed: Duration) -> LogRecord {
        let mut attributes = vec![
            Attribute::string(ATTR_OPERATION, operation::resolve(event)),
            Attribute::int(ATTR_OPERATION_DURATION_MS, duration_ms(elapsed)),
        ];
        if let Some(err) = self.failure(event.err.as_ref()) {
            attributes.push(Attribute::error(ATTR_ERROR, err));
        }

        LogRecord {
            severity: self.classify(elapsed, event.err.as_ref()),
            message: event.query.clone(),
            attributes,
        }
    }
}

impl Default for QueryLogHook {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl QueryHook for QueryLogHook {
    fn before_query(&self, ctx: QueryContext, _event: &QueryEvent) -> QueryContext {
        ctx
    }

    fn after_query(&self, ctx: &QueryContext, event: &QueryEvent) {
        if !self.settings.enabled {
            return;
        }

        let record = self.build_record(event, event.elapsed());
        if let Err(e) = self.settings.sink.emit(ctx, &record) {
            trace!(target: "querylog::dropped", error = %e, "query log record dropped");
        }
    }
}

/// Fold every config diagnostic into one error.
fn config_error(errors: Vec<ConfigError>) -> QueryLogError {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    QueryLogError::Config(messages.join("; "))
}

/// Whole milliseconds in `elapsed`, truncated, saturating at `i64::MAX`.
pub fn duration_ms(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_truncated_not_rounded() {
        assert_eq!(duration_ms(Duration::from_micros(1_999)), 1);
        assert_eq!(duration_ms(Duration::from_micros(999)), 0);
        assert_eq!(duration_ms(Duration::from_millis(10)), 10);
    }

    #[test]
    fn duration_saturates() {
        assert_eq!(duration_ms(Duration::MAX), i64::MAX);
    }

    #[test]
    fn threshold_is_inclusive() {
        let hook = QueryLogHook::new([HookOption::SlowThreshold(Duration::from_millis(5))]);
        assert_eq!(hook.classify(Duration::from_millis(5), None), Severity::Warn);
        assert_eq!(
            hook.classify(Duration::from_micros(4_999), None),
            Severity::Debug
        );
    }

    #[test]
    fn zero_threshold_disables_slow_detection() {
        let hook = QueryLogHook::default();
        assert_eq!(hook.classify(Duration::from_secs(3600), None), Severity::Debug);
    }

    #[test]
    fn failure_beats_slowness() {
        let hook = QueryLogHook::new([HookOption::SlowThreshold(Duration::from_millis(1))]);
        let err = QueryError::driver("disk I/O error");
        assert_eq!(
            hook.classify(Duration::from_secs(1), Some(&err)),
            Severity::Error
        );
    }

    #[test]
    fn slow_no_rows_is_slow_not_error() {
        let hook = QueryLogHook::new([HookOption::SlowThreshold(Duration::from_millis(1))]);
        assert_eq!(
            hook.classify(Duration::from_millis(2), Some(&QueryError::NoRows)),
            Severity::Warn
        );
    }

    #[test]
    fn record_carries_error_only_on_failure() {
        let hook = QueryLogHook::default();

        let failed = QueryEvent::new("SELECT 1").with_error(QueryError::driver("boom"));
        let record = hook.build_record(&failed, Duration::from_millis(3));
        assert_eq!(record.message, "SELECT 1");
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(record.duration_ms(), Some(3));
        assert_eq!(
            record.attr(ATTR_ERROR).map(ToString::to_string).as_deref(),
            Some("boom")
        );

        let empty = QueryEvent::new("SELECT 1").with_error(QueryError::NoRows);
        let record = hook.build_record(&empty, Duration::from_millis(3));
        assert_eq!(record.severity, Severity::Debug);
        assert!(record.attr(ATTR_ERROR).is_none());
    }

    #[test]
    fn before_query_returns_context_unchanged() {
        let hook = QueryLogHook::default();
        let ctx = QueryContext::new().with_request_id("req-1");
        let out = hook.before_query(ctx, &QueryEvent::new("SELECT 1"));
        assert_eq!(out.request_id(), Some("req-1"));
    }

    #[test]
    fn from_toml_applies_hook_section() {
        let hook =
            QueryLogHook::from_toml("[hook]\nslow_threshold_ms = 20\nslow_level = \"error\"\n")
                .unwrap();
        assert_eq!(hook.settings().slow_threshold, Duration::from_millis(20));
        assert_eq!(hook.classify(Duration::from_millis(25), None), Severity::Error);
    }

    #[test]
    fn from_toml_reports_every_problem_as_config_error() {
        let err = QueryLogHook::from_toml("[hook]\nslow_treshold_ms = 20\n").unwrap_err();
        match err {
            QueryLogError::Config(message) => assert!(message.contains("slow_treshold_ms")),
            other => panic!("expected Config error, got {other:?}"),
        }

        let err = QueryLogHook::from_toml("[hook]\nenabled_env = [\"\"]\n").unwrap_err();
        assert!(matches!(err, QueryLogError::Config(_)));
    }

    #[test]
    fn hook_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryLogHook>();
    }
}
