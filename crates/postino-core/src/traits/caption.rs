// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative caption adapter trait.

use async_trait::async_trait;

use crate::error::PostinoError;
use crate::types::MediaAnalysis;

/// Produces one publishable caption from the collected material.
///
/// Prompt content is an implementation concern of the adapter; the
/// caller only depends on getting caption text back.
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    async fn generate(
        &self,
        analyses: &[MediaAnalysis],
        user_note: &str,
        target_channels: &[String],
    ) -> Result<String, PostinoError>;
}
