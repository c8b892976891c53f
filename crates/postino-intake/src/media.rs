// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media intake: download, durable storage, vision analysis.
//!
//! `ingest` never fails. A fetch or storage failure keeps the raw
//! transport reference as the media URL; a vision failure (or a video,
//! which the analyzer contract does not cover) records
//! [`MediaAnalysis::Unavailable`]. The state machine proceeds either way.

use std::sync::Arc;
use std::time::Duration;

use postino_core::traits::{MediaFetcher, ObjectStore, VisionAnalyzer};
use postino_core::types::{FetchedMedia, MediaAnalysis, MediaItem, MediaKind};
use tracing::debug;

use crate::{bounded, record_fallback};

/// Ingests one inbound media reference into a [`MediaItem`].
pub struct MediaIntake {
    fetcher: Arc<dyn MediaFetcher>,
    objects: Arc<dyn ObjectStore>,
    vision: Arc<dyn VisionAnalyzer>,
    fetch_timeout: Duration,
    adapter_timeout: Duration,
}

impl MediaIntake {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        objects: Arc<dyn ObjectStore>,
        vision: Arc<dyn VisionAnalyzer>,
        fetch_timeout: Duration,
        adapter_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            objects,
            vision,
            fetch_timeout,
            adapter_timeout,
        }
    }

    /// Downloads, stores, and analyzes one media reference.
    pub async fn ingest(&self, media_ref: &str, kind: MediaKind) -> MediaItem {
        let fetched = match bounded(self.fetch_timeout, self.fetcher.fetch(media_ref)).await {
            Ok(fetched) => fetched,
            Err(e) => {
                record_fallback("media_fetch", &e);
                return placeholder_item(media_ref, kind);
            }
        };

        let key = storage_key(kind, &fetched.mime_type);
        let stored = match bounded(
            self.adapter_timeout,
            self.objects.put(&key, &fetched.bytes, &fetched.mime_type),
        )
        .await
        {
            Ok(stored) => stored,
            Err(e) => {
                record_fallback("object_store", &e);
                return placeholder_item(media_ref, kind);
            }
        };

        let analysis = self.analyze(&fetched, kind).await;

        debug!(
            media_ref,
            storage_key = stored.key.as_str(),
            bytes = fetched.bytes.len(),
            "media ingested"
        );

        MediaItem {
            storage_url: stored.url,
            storage_key: stored.key,
            kind,
            analysis,
        }
    }

    async fn analyze(&self, fetched: &FetchedMedia, kind: MediaKind) -> MediaAnalysis {
        if kind == MediaKind::Video {
            debug!("skipping vision analysis for video media");
            return MediaAnalysis::Unavailable;
        }

        match bounded(self.adapter_timeout, self.vision.describe(fetched)).await {
            Ok(insight) => insight.into(),
            Err(e) => {
                record_fallback("vision", &e);
                MediaAnalysis::Unavailable
            }
        }
    }
}

/// Item recorded when the bytes never reached durable storage: the
/// transport reference stands in for the URL, the key stays empty.
fn placeholder_item(media_ref: &str, kind: MediaKind) -> MediaItem {
    MediaItem {
        storage_url: media_ref.to_string(),
        storage_key: String::new(),
        kind,
        analysis: MediaAnalysis::Unavailable,
    }
}

fn storage_key(kind: MediaKind, mime_type: &str) -> String {
    let ext = match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        _ => "bin",
    };
    format!("{}/{}.{}", kind, uuid::Uuid::new_v4(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postino_test_utils::{StubFetcher, StubObjectStore, StubVision};

    fn intake(
        fetcher: StubFetcher,
        objects: StubObjectStore,
        vision: StubVision,
    ) -> MediaIntake {
        MediaIntake::new(
            Arc::new(fetcher),
            Arc::new(objects),
            Arc::new(vision),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn successful_ingest_stores_and_describes() {
        let intake = intake(StubFetcher::new(), StubObjectStore::new(), StubVision::new());
        let item = intake.ingest("media-123", MediaKind::Image).await;

        assert!(item.storage_url.starts_with("https://media.test/image/"));
        assert!(item.storage_key.ends_with(".jpg"));
        assert!(matches!(item.analysis, MediaAnalysis::Described { .. }));
    }

    #[tokio::test]
    async fn fetch_failure_yields_placeholder() {
        let intake = intake(
            StubFetcher::failing(),
            StubObjectStore::new(),
            StubVision::new(),
        );
        let item = intake.ingest("media-123", MediaKind::Image).await;

        assert_eq!(item.storage_url, "media-123");
        assert!(item.storage_key.is_empty());
        assert_eq!(item.analysis, MediaAnalysis::Unavailable);
    }

    #[tokio::test]
    async fn store_failure_yields_placeholder() {
        let intake = intake(
            StubFetcher::new(),
            StubObjectStore::failing(),
            StubVision::new(),
        );
        let item = intake.ingest("media-123", MediaKind::Image).await;

        assert_eq!(item.storage_url, "media-123");
        assert_eq!(item.analysis, MediaAnalysis::Unavailable);
    }

    #[tokio::test]
    async fn vision_failure_keeps_stored_media() {
        let intake = intake(
            StubFetcher::new(),
            StubObjectStore::new(),
            StubVision::failing(),
        );
        let item = intake.ingest("media-123", MediaKind::Image).await;

        // The bytes made it to storage even though analysis degraded.
        assert!(item.storage_url.starts_with("https://media.test/"));
        assert_eq!(item.analysis, MediaAnalysis::Unavailable);
    }

    #[tokio::test]
    async fn video_skips_vision() {
        let intake = intake(StubFetcher::new(), StubObjectStore::new(), StubVision::new());
        let item = intake.ingest("clip-1", MediaKind::Video).await;

        assert_eq!(item.kind, MediaKind::Video);
        assert_eq!(item.analysis, MediaAnalysis::Unavailable);
    }
}
