// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound side of the messaging channel.

use async_trait::async_trait;

use crate::error::PostinoError;
use crate::types::Button;

/// Maximum number of action buttons per reply. Inherited from the
/// messaging transport, not re-derived here.
pub const MAX_BUTTONS: usize = 3;

/// Sends replies back to a sender over the messaging transport.
///
/// A side-effecting boundary only; the conversation engine never reads
/// anything back through it.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Sends a plain text reply.
    async fn send_text(&self, sender_id: &str, text: &str) -> Result<(), PostinoError>;

    /// Sends a reply with up to [`MAX_BUTTONS`] action buttons and an
    /// optional header line.
    async fn send_buttons(
        &self,
        sender_id: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
    ) -> Result<(), PostinoError>;
}
