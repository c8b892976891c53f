// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Postino content-intake pipeline.

use thiserror::Error;

/// The primary error type used across all Postino adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PostinoError {
    /// Configuration errors (invalid TOML, missing required fields, bad combinations).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session store errors (connection failure, query failure, record serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound channel errors (send failure, transport rejection).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External adapter errors (media fetch, object storage, vision, speech, caption).
    #[error("adapter error: {message}")]
    Adapter {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Publish request emission errors. These surface to the sender so
    /// "confirm" can be retried; the conversation record is kept.
    #[error("publish error: {message}")]
    Publish {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
