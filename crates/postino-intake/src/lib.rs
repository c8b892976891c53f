// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake adapters for the Postino pipeline.
//!
//! Each intake wraps its external calls in a bounded timeout and
//! converts every failure into the documented fallback value, so a
//! slow or broken provider degrades a turn instead of aborting it.
//! Only the conversation engine decides what a degraded value means.

pub mod composer;
pub mod fetcher;
pub mod media;
pub mod speech;

pub use composer::{fallback_caption, DraftComposer};
pub use fetcher::HttpMediaFetcher;
pub use media::MediaIntake;
pub use speech::SpeechIntake;

use std::future::Future;
use std::time::Duration;

use postino_core::PostinoError;

/// Awaits `fut` for at most `limit`, mapping expiry to a timeout error.
pub(crate) async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, PostinoError>>,
) -> Result<T, PostinoError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(PostinoError::Timeout { duration: limit }),
    }
}

/// Records one adapter fallback for observability.
pub(crate) fn record_fallback(adapter: &'static str, err: &PostinoError) {
    tracing::warn!(adapter, error = %err, "adapter call failed, using fallback value");
    metrics::counter!("postino_adapter_fallbacks_total", "adapter" => adapter).increment(1);
}
