// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Degrading wrapper: shared store first, in-process map after a failure.
//!
//! Once the shared store errors, every later operation goes to the
//! local map for the remainder of the process lifetime. Records held
//! by the shared store at degradation time are not migrated; affected
//! senders simply start a fresh conversation. Multi-instance
//! deployments must disable this wrapper (enforced by config
//! validation), since a degraded instance stops seeing its peers'
//! records.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use postino_core::{ConversationRecord, PostinoError, SessionStore};
use tracing::warn;

use crate::memory::MemorySessionStore;

/// Session store that degrades from a shared backend to a local map.
pub struct DegradingStore {
    shared: Arc<dyn SessionStore>,
    local: MemorySessionStore,
    degraded: AtomicBool,
}

impl DegradingStore {
    pub fn new(shared: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self {
            shared,
            local: MemorySessionStore::new(ttl),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether the wrapper has fallen back to the in-process store.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn enter_degraded(&self, err: &PostinoError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(
                error = %err,
                "shared session store unavailable, degrading to in-process store \
                 for the lifetime of this instance"
            );
        }
    }
}

#[async_trait]
impl SessionStore for DegradingStore {
    async fn get(&self, sender_id: &str) -> Result<Option<ConversationRecord>, PostinoError> {
        if !self.is_degraded() {
            match self.shared.get(sender_id).await {
                Ok(record) => return Ok(record),
                Err(e) => self.enter_degraded(&e),
            }
        }
        self.local.get(sender_id).await
    }

    async fn save(&self, record: &ConversationRecord) -> Result<(), PostinoError> {
        if !self.is_degraded() {
            match self.shared.save(record).await {
                Ok(()) => return Ok(()),
                Err(e) => self.enter_degraded(&e),
            }
        }
        self.local.save(record).await
    }

    async fn delete(&self, sender_id: &str) -> Result<(), PostinoError> {
        if !self.is_degraded() {
            match self.shared.delete(sender_id).await {
                Ok(()) => return Ok(()),
                Err(e) => self.enter_degraded(&e),
            }
        }
        self.local.delete(sender_id).await
    }
}
