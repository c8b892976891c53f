// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Downstream publish-request sink.

use async_trait::async_trait;

use crate::error::PostinoError;

/// Hands a confirmed post over to the downstream scheduling subsystem.
///
/// The sink itself is a plain create operation; the engine enforces
/// at-most-once emission per `(conversation_id, channel)` through the
/// record's `pending_request_ids`.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Emits one publish request and returns its downstream id.
    async fn emit(
        &self,
        conversation_id: &str,
        channel: &str,
        caption: &str,
        media_urls: &[String],
    ) -> Result<String, PostinoError>;
}
