// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text adapter trait.

use async_trait::async_trait;

use crate::error::PostinoError;
use crate::types::FetchedMedia;

/// Transcribes a voice note to text.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(&self, media: &FetchedMedia) -> Result<String, PostinoError>;
}
