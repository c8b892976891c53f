// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Postino.
//!
//! Layered TOML loading (defaults, system, XDG, local, environment)
//! with unknown-key rejection, typo suggestions, and semantic
//! validation collected into renderable diagnostics.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{figment_to_config_errors, render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PostinoConfig;
pub use validation::validate_config;

/// Load configuration from the standard hierarchy and validate it.
///
/// Returns all deserialization and validation errors together so a
/// misconfigured deployment sees every problem in one run.
pub fn load_and_validate() -> Result<PostinoConfig, Vec<ConfigError>> {
    let config = loader::load_config().map_err(figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it (tests, tooling).
pub fn load_and_validate_str(toml_content: &str) -> Result<PostinoConfig, Vec<ConfigError>> {
    let config =
        loader::load_config_from_str(toml_content).map_err(figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
