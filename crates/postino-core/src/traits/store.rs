// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for conversation records.

use async_trait::async_trait;

use crate::error::PostinoError;
use crate::types::ConversationRecord;

/// Key-value persistence for conversation records, keyed by normalized
/// sender id, with last-write-wins semantics and a TTL refreshed on
/// every save.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the live record for a sender, if one exists and has not expired.
    async fn get(&self, sender_id: &str) -> Result<Option<ConversationRecord>, PostinoError>;

    /// Writes the record, replacing any previous version and refreshing its TTL.
    async fn save(&self, record: &ConversationRecord) -> Result<(), PostinoError>;

    /// Removes the record for a sender. Removing an absent record is not an error.
    async fn delete(&self, sender_id: &str) -> Result<(), PostinoError>;
}
