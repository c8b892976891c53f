// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Postino.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Postino configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with
/// environment variable overrides. All sections are optional and
/// default to values that run a single-instance deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostinoConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Conversation session store settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Deployment topology settings.
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Media/speech/caption adapter settings.
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Publish target settings.
    #[serde(default)]
    pub publish: PublishConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service instance.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "postino".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Store backend: `sqlite` (shared, durable) or `memory`
    /// (per-process, test/dev only).
    #[serde(default = "default_store_backend")]
    pub store: String,

    /// Path to the SQLite database file (ignored for the memory backend).
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Conversation TTL in seconds, refreshed on every save. A sender
    /// silent past this window starts fresh.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Permit degrading to the in-process store when the shared store
    /// fails. Must be disabled for multi-instance deployments.
    #[serde(default = "default_allow_degraded")]
    pub allow_degraded: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: default_store_backend(),
            database_path: default_database_path(),
            ttl_secs: default_ttl_secs(),
            allow_degraded: default_allow_degraded(),
        }
    }
}

fn default_store_backend() -> String {
    "sqlite".to_string()
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("postino").join("postino.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("postino.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_ttl_secs() -> u64 {
    1800
}

fn default_allow_degraded() -> bool {
    true
}

/// Deployment topology configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Whether more than one instance serves the same senders. When
    /// true, startup refuses any configuration that could split
    /// conversation state across processes.
    #[serde(default)]
    pub multi_instance: bool,
}

/// Adapter call bounds for the intake path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    /// Timeout in seconds for each vision/speech/caption call.
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,

    /// Timeout in seconds for downloading media bytes from the transport.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            adapter_timeout_secs: default_adapter_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_adapter_timeout_secs() -> u64 {
    20
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Publish target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Destination channels each new conversation targets, in order.
    #[serde(default = "default_channels")]
    pub default_channels: Vec<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_channels: default_channels(),
        }
    }
}

fn default_channels() -> Vec<String> {
    vec!["instagram".to_string()]
}
