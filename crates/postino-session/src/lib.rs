// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store implementations for Postino conversation records.
//!
//! Two explicit backends behind [`postino_core::SessionStore`] plus a
//! degrading wrapper:
//! - [`SqliteSessionStore`]: shared, durable, TTL-expiring.
//! - [`MemorySessionStore`]: per-process map with the same semantics.
//! - [`DegradingStore`]: shared first, sticky fallback to local.

pub mod degrade;
pub mod memory;
pub mod sqlite;

pub use degrade::DegradingStore;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;
