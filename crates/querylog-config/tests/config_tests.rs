// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the querylog configuration system.

use std::time::Duration;

use querylog_config::diagnostic::ConfigError;
use querylog_config::model::QueryLogConfig;
use querylog_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use querylog_core::Severity;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[hook]
enabled = false
enabled_env = ["APP_SQL_DEBUG", "QUERYLOG_DEBUG"]
query_level = "info"
slow_level = "error"
error_level = "warn"
slow_threshold_ms = 150
benign_error_codes = ["ConstraintViolation"]

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert!(!config.hook.enabled);
    assert_eq!(config.hook.enabled_env, vec!["APP_SQL_DEBUG", "QUERYLOG_DEBUG"]);
    assert_eq!(config.hook.query_level, Severity::Info);
    assert_eq!(config.hook.slow_level, Severity::Error);
    assert_eq!(config.hook.error_level, Severity::Warn);
    assert_eq!(config.hook.slow_threshold(), Duration::from_millis(150));
    assert_eq!(config.hook.benign_error_codes, vec!["ConstraintViolation"]);
    assert_eq!(config.logging.level, "debug");
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert!(config.hook.enabled);
    assert!(config.hook.enabled_env.is_empty());
    assert_eq!(config.hook.query_level, Severity::Debug);
    assert_eq!(config.hook.slow_level, Severity::Warn);
    assert_eq!(config.hook.error_level, Severity::Error);
    assert_eq!(config.hook.slow_threshold_ms, 0);
    assert_eq!(config.logging.level, "info");
}

/// Unknown field in [hook] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_hook_field_suggests_correction() {
    let toml = r#"
[hook]
slow_treshold_ms = 100
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "slow_treshold_ms");
            assert_eq!(suggestion.as_deref(), Some("slow_threshold_ms"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Inline TOML errors point at the offending key in the string itself.
#[test]
fn inline_unknown_key_has_source_span() {
    let toml = "[hook]\nslow_levle = \"warn\"\n";

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    match &errors[0] {
        ConfigError::UnknownKey { span, src, .. } => {
            let span = span.expect("inline source should resolve a span");
            assert_eq!(
                &toml[span.offset()..span.offset() + span.len()],
                "slow_levle"
            );
            let src = src.as_ref().expect("inline source should be attached");
            assert_eq!(src.name(), querylog_config::diagnostic::INLINE_SOURCE);
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[metrics]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("metrics"),
        "error should mention the unknown section, got: {err_str}"
    );
}

/// A severity that is not a known level is reported, not silently defaulted.
#[test]
fn unknown_severity_is_reported() {
    let toml = r#"
[hook]
slow_level = "loud"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown severity");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownVariant { value, .. } | ConfigError::Other(value)
                if value.contains("loud")
        )),
        "expected a diagnostic naming the bad value, got {errors:?}"
    );
}

/// Wrong value type produces an error.
#[test]
fn wrong_type_is_rejected() {
    let toml = r#"
[hook]
slow_threshold_ms = "fast"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Validation runs after a successful parse.
#[test]
fn validation_errors_surface_from_str_loader() {
    let toml = r#"
[hook]
enabled_env = [""]

[logging]
level = "chatty"
"#;

    let errors = load_and_validate_str(toml).expect_err("validation should fail");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Config file on disk plus environment overrides merge in order.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[hook]
slow_threshold_ms = 100
query_level = "info"
"#,
        )?;
        jail.set_env("QUERYLOG_HOOK_SLOW_THRESHOLD_MS", "250");
        jail.set_env("QUERYLOG_LOGGING_LEVEL", "warn");
        // The hook's own enable switch shares the prefix and must be ignored.
        jail.set_env("QUERYLOG_DEBUG", "1");

        let config = load_config_from_path(std::path::Path::new("custom.toml"))
            .expect("env overrides should merge");
        assert_eq!(config.hook.slow_threshold_ms, 250);
        assert_eq!(config.hook.query_level, Severity::Info);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    });
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_file_uses_defaults() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/querylog.toml"))
        .expect("missing file should be silently skipped");
    assert!(config.hook.enabled);
}

/// Serialized defaults parse back to the same values.
#[test]
fn defaults_survive_toml_serialization() {
    let rendered = toml::to_string(&QueryLogConfig::default()).expect("should serialize");
    let parsed: QueryLogConfig = toml::from_str(&rendered).expect("should parse back");
    assert_eq!(parsed.hook.query_level, Severity::Debug);
    assert_eq!(parsed.hook.slow_level, Severity::Warn);
    assert_eq!(parsed.logging.level, "info");
}
