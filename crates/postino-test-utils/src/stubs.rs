// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted stub adapters for the intake path.
//!
//! Each stub either succeeds deterministically or fails, so intake and
//! engine tests can exercise every fallback branch without touching a
//! real provider.

use async_trait::async_trait;

use postino_core::traits::{
    CaptionGenerator, MediaFetcher, ObjectStore, SpeechTranscriber, VisionAnalyzer,
};
use postino_core::types::{FetchedMedia, MediaAnalysis, StoredObject, VisionInsight};
use postino_core::PostinoError;

fn scripted_failure(what: &str) -> PostinoError {
    PostinoError::Adapter {
        message: format!("scripted {what} failure"),
        source: None,
    }
}

/// Fetcher returning the media reference itself as bytes, or failing.
pub struct StubFetcher {
    fail: bool,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaFetcher for StubFetcher {
    async fn fetch(&self, media_ref: &str) -> Result<FetchedMedia, PostinoError> {
        if self.fail {
            return Err(scripted_failure("fetch"));
        }
        Ok(FetchedMedia {
            bytes: media_ref.as_bytes().to_vec(),
            mime_type: "image/jpeg".to_string(),
        })
    }
}

/// Object store minting `https://media.test/<key>` URLs, or failing.
pub struct StubObjectStore {
    fail: bool,
}

impl StubObjectStore {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for StubObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for StubObjectStore {
    async fn put(
        &self,
        key: &str,
        _bytes: &[u8],
        _mime_type: &str,
    ) -> Result<StoredObject, PostinoError> {
        if self.fail {
            return Err(scripted_failure("object store"));
        }
        Ok(StoredObject {
            url: format!("https://media.test/{key}"),
            key: key.to_string(),
        })
    }
}

/// Vision analyzer returning a fixed insight, or failing.
pub struct StubVision {
    insight: Option<VisionInsight>,
}

impl StubVision {
    pub fn describing(insight: VisionInsight) -> Self {
        Self {
            insight: Some(insight),
        }
    }

    /// A plausible default insight for tests that only need success.
    pub fn new() -> Self {
        Self::describing(VisionInsight {
            description: "a fresh pastry on a ceramic plate".to_string(),
            tags: vec!["bakery".to_string(), "pastry".to_string()],
            mood: "inviting".to_string(),
        })
    }

    pub fn failing() -> Self {
        Self { insight: None }
    }
}

impl Default for StubVision {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionAnalyzer for StubVision {
    async fn describe(&self, _media: &FetchedMedia) -> Result<VisionInsight, PostinoError> {
        match &self.insight {
            Some(insight) => Ok(insight.clone()),
            None => Err(scripted_failure("vision")),
        }
    }
}

/// Transcriber returning a fixed transcript, empty text, or failing.
pub struct StubTranscriber {
    transcript: Option<String>,
}

impl StubTranscriber {
    pub fn with_transcript(text: impl Into<String>) -> Self {
        Self {
            transcript: Some(text.into()),
        }
    }

    /// Transcription succeeds but hears nothing.
    pub fn empty() -> Self {
        Self {
            transcript: Some(String::new()),
        }
    }

    pub fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl SpeechTranscriber for StubTranscriber {
    async fn transcribe(&self, _media: &FetchedMedia) -> Result<String, PostinoError> {
        match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => Err(scripted_failure("transcription")),
        }
    }
}

/// Caption generator returning a fixed caption, or failing.
pub struct StubCaption {
    caption: Option<String>,
}

impl StubCaption {
    pub fn with_caption(text: impl Into<String>) -> Self {
        Self {
            caption: Some(text.into()),
        }
    }

    pub fn new() -> Self {
        Self::with_caption("Warm from the oven and ready for you. #bakery #fresh")
    }

    pub fn failing() -> Self {
        Self { caption: None }
    }
}

impl Default for StubCaption {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionGenerator for StubCaption {
    async fn generate(
        &self,
        _analyses: &[MediaAnalysis],
        _user_note: &str,
        _target_channels: &[String],
    ) -> Result<String, PostinoError> {
        match &self.caption {
            Some(caption) => Ok(caption.clone()),
            None => Err(scripted_failure("caption")),
        }
    }
}
