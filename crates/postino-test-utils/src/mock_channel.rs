// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound channel for deterministic testing.
//!
//! `MockOutbound` implements `OutboundChannel`, capturing every reply
//! for assertion in tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use postino_core::traits::channel::OutboundChannel;
use postino_core::types::Button;
use postino_core::PostinoError;

/// One captured outbound reply.
#[derive(Debug, Clone)]
pub enum SentReply {
    Text {
        sender_id: String,
        text: String,
    },
    Buttons {
        sender_id: String,
        body: String,
        buttons: Vec<Button>,
        header: Option<String>,
    },
}

impl SentReply {
    /// The body text of the reply, whichever shape it took.
    pub fn body(&self) -> &str {
        match self {
            SentReply::Text { text, .. } => text,
            SentReply::Buttons { body, .. } => body,
        }
    }

    /// The button ids offered, empty for plain text replies.
    pub fn button_ids(&self) -> Vec<String> {
        match self {
            SentReply::Text { .. } => Vec::new(),
            SentReply::Buttons { buttons, .. } => {
                buttons.iter().map(|b| b.id.to_string()).collect()
            }
        }
    }
}

/// A mock outbound channel that captures sent replies.
#[derive(Default)]
pub struct MockOutbound {
    sent: Mutex<Vec<SentReply>>,
}

impl MockOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    /// All replies sent so far, in order.
    pub async fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// The most recent reply, if any.
    pub async fn last(&self) -> Option<SentReply> {
        self.sent.lock().await.last().cloned()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl OutboundChannel for MockOutbound {
    async fn send_text(&self, sender_id: &str, text: &str) -> Result<(), PostinoError> {
        self.sent.lock().await.push(SentReply::Text {
            sender_id: sender_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_buttons(
        &self,
        sender_id: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
    ) -> Result<(), PostinoError> {
        self.sent.lock().await.push(SentReply::Buttons {
            sender_id: sender_id.to_string(),
            body: body.to_string(),
            buttons: buttons.to_vec(),
            header: header.map(|h| h.to_string()),
        });
        Ok(())
    }
}
