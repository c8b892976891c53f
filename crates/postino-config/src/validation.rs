// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, including the deployment-topology rules around the
//! session store.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::PostinoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const STORE_BACKENDS: &[&str] = &["sqlite", "memory"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &PostinoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.agent.log_level
            ),
        });
    }

    if !STORE_BACKENDS.contains(&config.session.store.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.store must be one of {STORE_BACKENDS:?}, got `{}`",
                config.session.store
            ),
        });
    }

    if config.session.store == "sqlite" && config.session.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.database_path must not be empty for the sqlite store".to_string(),
        });
    }

    if config.session.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.ttl_secs must be at least 1".to_string(),
        });
    }

    if config.intake.adapter_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "intake.adapter_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.intake.fetch_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "intake.fetch_timeout_secs must be at least 1".to_string(),
        });
    }

    // A multi-instance deployment must not keep conversation state in a
    // single process: the memory store and the degraded-store fallback
    // both pin records to one instance.
    if config.deployment.multi_instance {
        if config.session.store == "memory" {
            errors.push(ConfigError::Validation {
                message: "deployment.multi_instance requires the shared sqlite session store, \
                          not session.store = \"memory\""
                    .to_string(),
            });
        }
        if config.session.allow_degraded {
            errors.push(ConfigError::Validation {
                message: "deployment.multi_instance requires session.allow_degraded = false \
                          (a degraded instance would strand conversations)"
                    .to_string(),
            });
        }
    }

    if config.publish.default_channels.is_empty() {
        errors.push(ConfigError::Validation {
            message: "publish.default_channels must name at least one channel".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for channel in &config.publish.default_channels {
        if channel.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "publish.default_channels must not contain empty names".to_string(),
            });
        } else if !seen.insert(channel) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate channel `{channel}` in publish.default_channels"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
