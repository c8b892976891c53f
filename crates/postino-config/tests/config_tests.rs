// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Postino configuration system.

use postino_config::{load_and_validate_str, load_config_from_str, ConfigError};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_postino_config() {
    let toml = r#"
[agent]
name = "postino-staging"
log_level = "debug"

[session]
store = "sqlite"
database_path = "/tmp/postino-test.db"
ttl_secs = 900
allow_degraded = false

[deployment]
multi_instance = true

[intake]
adapter_timeout_secs = 10
fetch_timeout_secs = 15

[publish]
default_channels = ["instagram", "facebook"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "postino-staging");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.session.store, "sqlite");
    assert_eq!(config.session.database_path, "/tmp/postino-test.db");
    assert_eq!(config.session.ttl_secs, 900);
    assert!(!config.session.allow_degraded);
    assert!(config.deployment.multi_instance);
    assert_eq!(config.intake.adapter_timeout_secs, 10);
    assert_eq!(config.intake.fetch_timeout_secs, 15);
    assert_eq!(
        config.publish.default_channels,
        vec!["instagram", "facebook"]
    );
}

/// Empty TOML falls back to defaults everywhere.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "postino");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.session.store, "sqlite");
    assert_eq!(config.session.ttl_secs, 1800);
    assert!(config.session.allow_degraded);
    assert!(!config.deployment.multi_instance);
    assert_eq!(config.publish.default_channels, vec!["instagram"]);
}

/// Unknown field in [session] produces an error mentioning the bad key.
#[test]
fn unknown_field_in_session_produces_error() {
    let toml = r#"
[session]
databse_path = "/tmp/x.db"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("databse_path"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Validation failures arrive together, not one at a time.
#[test]
fn validation_collects_all_errors() {
    let toml = r#"
[agent]
log_level = "loud"

[session]
ttl_secs = 0

[publish]
default_channels = []
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 3, "expected 3+ errors, got {}", errors.len());
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// The multi-instance topology rule is enforced at load time.
#[test]
fn multi_instance_memory_store_refused_at_load() {
    let toml = r#"
[session]
store = "memory"
allow_degraded = false

[deployment]
multi_instance = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("multi_instance")
    )));
}

/// A well-formed single-instance config passes end to end.
#[test]
fn default_config_loads_and_validates() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.agent.name, "postino");
}
