// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender single-flight gate.
//!
//! Two events for the same sender must not interleave their
//! read-modify-write of the conversation record; events for different
//! senders run fully in parallel. The gate hands out one keyed async
//! mutex per normalized sender id.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async mutexes, one per sender.
#[derive(Default)]
pub struct SenderGate {
    slots: DashMap<String, Arc<Mutex<()>>>,
}

impl SenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the single-flight slot for `key`, waiting behind any
    /// in-flight turn for the same sender.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let entry = self
                .slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            entry.value().clone()
            // The map shard lock is released here, before awaiting.
        };
        slot.lock_owned().await
    }

    /// Number of senders that have held a slot so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_serializes() {
        let gate = Arc::new(SenderGate::new());
        let in_flight = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            handles.push(tokio::spawn(async move {
                let _slot = gate.acquire("sender-1").await;
                // Exactly one task may be inside this section at a time.
                assert!(!in_flight.swap(true, Ordering::SeqCst));
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.store(false, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let gate = SenderGate::new();
        let slot_a = gate.acquire("sender-a").await;
        // Holding sender-a's slot must not block sender-b's.
        let slot_b = tokio::time::timeout(
            Duration::from_millis(100),
            gate.acquire("sender-b"),
        )
        .await
        .expect("acquiring a different key should not wait");
        drop(slot_a);
        drop(slot_b);
        assert_eq!(gate.len(), 2);
    }
}
