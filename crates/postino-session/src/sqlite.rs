// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed session store: one row per sender, TTL via `expires_at`.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Last-write-wins is the upsert below; expiry is enforced
//! lazily on read, so an expired row costs nothing until the sender
//! messages again.

use std::time::Duration;

use async_trait::async_trait;
use postino_core::{ConversationRecord, PostinoError, SessionStore};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Helper to convert tokio_rusqlite errors into PostinoError::Store.
fn storage_err(e: tokio_rusqlite::Error) -> PostinoError {
    PostinoError::Store {
        source: Box::new(e),
    }
}

/// Helper to convert rusqlite errors into PostinoError::Store.
fn rusqlite_err(e: rusqlite::Error) -> PostinoError {
    PostinoError::Store {
        source: Box::new(e),
    }
}

/// Shared, durable session store backed by SQLite.
pub struct SqliteSessionStore {
    conn: Connection,
    ttl: Duration,
}

impl SqliteSessionStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub async fn open(path: &str, ttl: Duration) -> Result<Self, PostinoError> {
        let conn = Connection::open(path).await.map_err(rusqlite_err)?;
        Self::with_connection(conn, ttl).await
    }

    /// Opens an in-memory database (tests and ephemeral tooling).
    pub async fn open_in_memory(ttl: Duration) -> Result<Self, PostinoError> {
        let conn = Connection::open_in_memory().await.map_err(rusqlite_err)?;
        Self::with_connection(conn, ttl).await
    }

    async fn with_connection(conn: Connection, ttl: Duration) -> Result<Self, PostinoError> {
        conn.call(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS conversations (
                     sender_id  TEXT PRIMARY KEY,
                     record     TEXT NOT NULL,
                     expires_at INTEGER NOT NULL
                 )",
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        Ok(Self { conn, ttl })
    }

    fn deadline(&self) -> i64 {
        chrono::Utc::now().timestamp() + self.ttl.as_secs() as i64
    }

    async fn purge(&self, sender_id: &str) -> Result<(), PostinoError> {
        let sender = sender_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM conversations WHERE sender_id = ?1",
                    params![sender],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, sender_id: &str) -> Result<Option<ConversationRecord>, PostinoError> {
        let sender = sender_id.to_string();
        let row: Option<(String, i64)> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT record, expires_at FROM conversations WHERE sender_id = ?1",
                )?;
                let result = stmt.query_row(params![sender], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                });
                match result {
                    Ok(pair) => Ok(Some(pair)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(storage_err)?;

        let now = chrono::Utc::now().timestamp();
        match row {
            None => Ok(None),
            Some((_, expires_at)) if expires_at <= now => {
                debug!(sender_id, "conversation record expired, purging");
                self.purge(sender_id).await?;
                Ok(None)
            }
            Some((json, _)) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| PostinoError::Store {
                    source: Box::new(e),
                }),
        }
    }

    async fn save(&self, record: &ConversationRecord) -> Result<(), PostinoError> {
        let sender = record.sender_id.clone();
        let json = serde_json::to_string(record).map_err(|e| PostinoError::Store {
            source: Box::new(e),
        })?;
        let expires_at = self.deadline();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO conversations (sender_id, record, expires_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(sender_id) DO UPDATE SET
                         record = excluded.record,
                         expires_at = excluded.expires_at",
                    params![sender, json, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    async fn delete(&self, sender_id: &str) -> Result<(), PostinoError> {
        self.purge(sender_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_store(ttl: Duration) -> (SqliteSessionStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("sessions.db");
        let store = SqliteSessionStore::open(db_path.to_str().unwrap(), ttl)
            .await
            .unwrap();
        (store, dir)
    }

    fn make_record(sender: &str) -> ConversationRecord {
        ConversationRecord::new(sender, vec!["instagram".into()])
    }

    #[tokio::test]
    async fn save_and_get_roundtrips() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        let record = make_record("491701234");

        store.save(&record).await.unwrap();
        let loaded = store.get("491701234").await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn get_absent_sender_returns_none() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_twice_is_last_write_wins() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        let mut record = make_record("491701234");
        store.save(&record).await.unwrap();

        record.user_note = "12 euros".to_string();
        record.touch();
        store.save(&record).await.unwrap();

        let loaded = store.get("491701234").await.unwrap().unwrap();
        assert_eq!(loaded.user_note, "12 euros");
        assert_eq!(loaded.turn_count, 1);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        let record = make_record("491701234");
        store.save(&record).await.unwrap();

        store.delete("491701234").await.unwrap();
        assert!(store.get("491701234").await.unwrap().is_none());

        // Deleting an absent record is not an error.
        store.delete("491701234").await.unwrap();
    }

    #[tokio::test]
    async fn expired_record_reads_as_absent() {
        let (store, _dir) = setup_store(Duration::from_secs(0)).await;
        let record = make_record("491701234");
        store.save(&record).await.unwrap();

        // ttl = 0 makes the deadline `now`, which `expires_at <= now` catches.
        assert!(store.get("491701234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_refreshes_ttl() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        let record = make_record("491701234");
        store.save(&record).await.unwrap();
        store.save(&record).await.unwrap();
        assert!(store.get("491701234").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn distinct_senders_do_not_collide() {
        let (store, _dir) = setup_store(Duration::from_secs(60)).await;
        store.save(&make_record("111")).await.unwrap();
        store.save(&make_record("222")).await.unwrap();

        store.delete("111").await.unwrap();
        assert!(store.get("111").await.unwrap().is_none());
        assert!(store.get("222").await.unwrap().is_some());
    }
}
