// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session store.
//!
//! Scoped to one running instance; suitable for tests, the local
//! shell, and as the degradation target when the shared store is
//! unreachable. Applies the same TTL semantics as the SQLite store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use postino_core::{ConversationRecord, PostinoError, SessionStore};
use tokio::sync::Mutex;

/// Per-process map store with lazy TTL expiry.
pub struct MemorySessionStore {
    records: Mutex<HashMap<String, (ConversationRecord, Instant)>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live (possibly expired, not yet purged) records.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, sender_id: &str) -> Result<Option<ConversationRecord>, PostinoError> {
        let mut records = self.records.lock().await;
        match records.get(sender_id) {
            None => Ok(None),
            Some((_, deadline)) if *deadline <= Instant::now() => {
                records.remove(sender_id);
                Ok(None)
            }
            Some((record, _)) => Ok(Some(record.clone())),
        }
    }

    async fn save(&self, record: &ConversationRecord) -> Result<(), PostinoError> {
        let deadline = Instant::now() + self.ttl;
        self.records
            .lock()
            .await
            .insert(record.sender_id.clone(), (record.clone(), deadline));
        Ok(())
    }

    async fn delete(&self, sender_id: &str) -> Result<(), PostinoError> {
        self.records.lock().await.remove(sender_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(sender: &str) -> ConversationRecord {
        ConversationRecord::new(sender, vec!["instagram".into()])
    }

    #[tokio::test]
    async fn save_get_delete_roundtrip() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let record = make_record("491701234");

        store.save(&record).await.unwrap();
        assert_eq!(store.get("491701234").await.unwrap().unwrap(), record);

        store.delete("491701234").await.unwrap();
        assert!(store.get("491701234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let mut record = make_record("491701234");
        store.save(&record).await.unwrap();

        record.draft_caption = "new caption".to_string();
        store.save(&record).await.unwrap();

        let loaded = store.get("491701234").await.unwrap().unwrap();
        assert_eq!(loaded.draft_caption, "new caption");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn expired_record_reads_as_absent() {
        let store = MemorySessionStore::new(Duration::from_millis(20));
        store.save(&make_record("491701234")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get("491701234").await.unwrap().is_none());
        // Lazy purge removed the entry on read.
        assert!(store.is_empty().await);
    }
}
