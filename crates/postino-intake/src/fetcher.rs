// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP media fetcher.
//!
//! Inbound media references resolve to short-lived CDN URLs on the
//! messaging transport; this fetcher downloads them with a bounded
//! timeout and carries the declared content type along.

use std::time::Duration;

use async_trait::async_trait;
use postino_core::traits::MediaFetcher;
use postino_core::types::FetchedMedia;
use postino_core::PostinoError;
use tracing::debug;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Downloads media bytes over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    /// Builds a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PostinoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostinoError::Adapter {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, media_ref: &str) -> Result<FetchedMedia, PostinoError> {
        let response = self
            .client
            .get(media_ref)
            .send()
            .await
            .map_err(|e| PostinoError::Adapter {
                message: format!("media download failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostinoError::Adapter {
                message: format!("media download returned {status}"),
                source: None,
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_MIME)
            .to_string();

        let bytes = response.bytes().await.map_err(|e| PostinoError::Adapter {
            message: format!("failed to read media body: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(media_ref, bytes = bytes.len(), mime_type, "media downloaded");

        Ok(FetchedMedia {
            bytes: bytes.to_vec(),
            mime_type,
        })
    }
}
