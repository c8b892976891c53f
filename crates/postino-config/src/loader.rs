// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./postino.toml` > `~/.config/postino/postino.toml`
//! > `/etc/postino/postino.toml`, with environment variable overrides via
//! the `POSTINO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PostinoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/postino/postino.toml` (system-wide)
/// 3. `~/.config/postino/postino.toml` (user XDG config)
/// 4. `./postino.toml` (local directory)
/// 5. `POSTINO_*` environment variables
pub fn load_config() -> Result<PostinoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and tooling that supplies config directly.
pub fn load_config_from_str(toml_content: &str) -> Result<PostinoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostinoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostinoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostinoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PostinoConfig::default()))
        .merge(Toml::file("/etc/postino/postino.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("postino/postino.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("postino.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys which
/// themselves contain underscores map correctly: `POSTINO_SESSION_DATABASE_PATH`
/// must become `session.database_path`, not `session.database.path`.
fn env_provider() -> Env {
    Env::prefixed("POSTINO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("session_", "session.", 1)
            .replacen("deployment_", "deployment.", 1)
            .replacen("intake_", "intake.", 1)
            .replacen("publish_", "publish.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[session]
ttl_secs = 600
store = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.session.ttl_secs, 600);
        assert_eq!(config.session.store, "memory");
        // Untouched sections keep their defaults.
        assert_eq!(config.agent.name, "postino");
    }

    #[test]
    fn env_var_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "postino.toml",
                r#"
[agent]
name = "from-toml"
"#,
            )?;
            jail.set_env("POSTINO_AGENT_NAME", "from-env");
            jail.set_env("POSTINO_SESSION_DATABASE_PATH", "/tmp/override.db");

            let config: PostinoConfig = build_figment().extract()?;
            assert_eq!(config.agent.name, "from-env");
            assert_eq!(config.session.database_path, "/tmp/override.db");
            Ok(())
        });
    }
}
