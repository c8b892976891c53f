// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits on the media path: fetch, durable storage, vision.

use async_trait::async_trait;

use crate::error::PostinoError;
use crate::types::{FetchedMedia, StoredObject, VisionInsight};

/// Resolves a transport media reference into raw bytes.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, media_ref: &str) -> Result<FetchedMedia, PostinoError>;
}

/// Persists media bytes to durable object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<StoredObject, PostinoError>;
}

/// Describes image content for downstream caption generation.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn describe(&self, media: &FetchedMedia) -> Result<VisionInsight, PostinoError>;
}
