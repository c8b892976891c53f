// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Postino workspace.
//!
//! The [`ConversationRecord`] is the single durable artifact of the
//! pipeline; its serde field names are the persisted JSON schema and
//! must stay stable across releases.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Normalizes a raw sender identifier into the session-store key form.
///
/// Strips a single leading `+` and all whitespace, so that equivalent
/// representations of the same phone number or chat id ("+49 170 1234",
/// "491701234") collide on the same conversation record.
pub fn normalize_sender_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
    without_plus.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Conversation phase. Stored uppercase in the serialized record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Phase {
    /// No material collected yet. Never persisted (see `ConversationRecord`).
    Idle,
    /// Media collected, waiting for more media or context text.
    Enriching,
    /// A draft caption exists and awaits confirm/edit/cancel.
    Confirming,
}

/// Kind of inbound media.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Result of a vision analysis call on a stored media item.
///
/// `Unavailable` is the explicit fallback written when analysis failed
/// or was skipped; consumers must distinguish it from an analysis that
/// ran and found nothing notable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MediaAnalysis {
    Described {
        description: String,
        tags: Vec<String>,
        mood: String,
    },
    Unavailable,
}

impl MediaAnalysis {
    /// The free-text description, if analysis produced one.
    pub fn description(&self) -> Option<&str> {
        match self {
            MediaAnalysis::Described { description, .. } => Some(description),
            MediaAnalysis::Unavailable => None,
        }
    }
}

/// Structured output of a [`crate::traits::VisionAnalyzer`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionInsight {
    pub description: String,
    pub tags: Vec<String>,
    pub mood: String,
}

impl From<VisionInsight> for MediaAnalysis {
    fn from(insight: VisionInsight) -> Self {
        MediaAnalysis::Described {
            description: insight.description,
            tags: insight.tags,
            mood: insight.mood,
        }
    }
}

/// One ingested media item: durably stored bytes plus their analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub storage_url: String,
    pub storage_key: String,
    pub kind: MediaKind,
    pub analysis: MediaAnalysis,
}

/// Raw media bytes fetched from the transport, before durable storage.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Handle to a durably stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

/// The serializable state of one sender's in-progress conversation.
///
/// At most one live instance exists per normalized sender id. The
/// session store is the sole durable owner; the engine holds a
/// transient copy for the duration of one turn. Records are only
/// persisted once they leave `IDLE`, which keeps the invariant
/// "IDLE record ⇔ empty record" trivially true for everything stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub conversation_id: String,
    pub sender_id: String,
    pub phase: Phase,
    pub media_items: Vec<MediaItem>,
    pub user_note: String,
    pub draft_caption: String,
    pub target_channels: Vec<String>,
    pub pending_request_ids: Vec<String>,
    pub last_activity_at: String,
    pub turn_count: u32,
}

impl ConversationRecord {
    /// Creates a fresh `IDLE` record for a normalized sender id.
    pub fn new(sender_id: impl Into<String>, target_channels: Vec<String>) -> Self {
        Self {
            conversation_id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            phase: Phase::Idle,
            media_items: Vec::new(),
            user_note: String::new(),
            draft_caption: String::new(),
            target_channels,
            pending_request_ids: Vec::new(),
            last_activity_at: chrono::Utc::now().to_rfc3339(),
            turn_count: 0,
        }
    }

    /// Updates bookkeeping for a processed turn.
    pub fn touch(&mut self) {
        self.last_activity_at = chrono::Utc::now().to_rfc3339();
        self.turn_count += 1;
    }

    /// True when the record carries no collected material.
    pub fn is_pristine(&self) -> bool {
        self.media_items.is_empty()
            && self.user_note.is_empty()
            && self.draft_caption.is_empty()
            && self.pending_request_ids.is_empty()
    }

    /// Durable URLs of all collected media, in arrival order.
    pub fn media_urls(&self) -> Vec<String> {
        self.media_items
            .iter()
            .map(|item| item.storage_url.clone())
            .collect()
    }

    /// Analyses of all collected media, in arrival order.
    pub fn analyses(&self) -> Vec<MediaAnalysis> {
        self.media_items
            .iter()
            .map(|item| item.analysis.clone())
            .collect()
    }
}

/// Identifiers of the fixed reply buttons the engine can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ButtonId {
    EnrichPublish,
    EnrichAdd,
    ConfirmPublish,
    ConfirmEdit,
    ConfirmCancel,
}

/// One action button offered on an outbound reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub title: String,
}

impl Button {
    pub fn new(id: ButtonId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// One normalized inbound event from the messaging transport.
///
/// Transport parsing and webhook verification happen upstream; the
/// engine only ever sees this form.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub sender_id: String,
    pub payload: EventPayload,
}

/// Payload of an inbound event, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Text {
        text: String,
    },
    Media {
        media_ref: String,
        kind: MediaKind,
        caption: Option<String>,
    },
    Voice {
        media_ref: String,
    },
    /// Button taps carry the raw id string; stale or unknown ids are
    /// dropped during dispatch rather than rejected at the boundary.
    Button {
        button_id: String,
    },
}

impl InboundEvent {
    pub fn text(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            payload: EventPayload::Text { text: text.into() },
        }
    }

    pub fn media(
        sender_id: impl Into<String>,
        media_ref: impl Into<String>,
        kind: MediaKind,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            payload: EventPayload::Media {
                media_ref: media_ref.into(),
                kind,
                caption: None,
            },
        }
    }

    pub fn media_with_caption(
        sender_id: impl Into<String>,
        media_ref: impl Into<String>,
        kind: MediaKind,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            payload: EventPayload::Media {
                media_ref: media_ref.into(),
                kind,
                caption: Some(caption.into()),
            },
        }
    }

    pub fn voice(sender_id: impl Into<String>, media_ref: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            payload: EventPayload::Voice {
                media_ref: media_ref.into(),
            },
        }
    }

    pub fn button(sender_id: impl Into<String>, button_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            payload: EventPayload::Button {
                button_id: button_id.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn normalize_strips_plus_and_whitespace() {
        assert_eq!(normalize_sender_id("+49 170 1234"), "491701234");
        assert_eq!(normalize_sender_id("  491701234  "), "491701234");
        assert_eq!(normalize_sender_id("49\t170\t1234"), "491701234");
    }

    #[test]
    fn normalize_strips_only_leading_plus() {
        // A second `+` is part of the id, not a prefix.
        assert_eq!(normalize_sender_id("++123"), "+123");
        assert_eq!(normalize_sender_id("123+456"), "123+456");
    }

    #[test]
    fn phase_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Phase::Idle).unwrap(), "\"IDLE\"");
        assert_eq!(
            serde_json::to_string(&Phase::Enriching).unwrap(),
            "\"ENRICHING\""
        );
        assert_eq!(
            serde_json::to_string(&Phase::Confirming).unwrap(),
            "\"CONFIRMING\""
        );
    }

    #[test]
    fn fresh_record_is_pristine_idle() {
        let record = ConversationRecord::new("491701234", vec!["instagram".into()]);
        assert_eq!(record.phase, Phase::Idle);
        assert!(record.is_pristine());
        assert_eq!(record.turn_count, 0);
    }

    #[test]
    fn idle_record_roundtrips_pristine_through_json() {
        let record = ConversationRecord::new("491701234", vec!["instagram".into()]);
        let json = serde_json::to_string(&record).unwrap();
        let back: ConversationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, Phase::Idle);
        assert!(back.is_pristine());
        assert_eq!(back, record);
    }

    #[test]
    fn record_json_uses_stable_field_names() {
        let record = ConversationRecord::new("491701234", vec!["instagram".into()]);
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        for field in [
            "sender_id",
            "phase",
            "media_items",
            "user_note",
            "draft_caption",
            "target_channels",
            "pending_request_ids",
            "last_activity_at",
            "turn_count",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn button_id_roundtrips_snake_case() {
        for id in [
            ButtonId::EnrichPublish,
            ButtonId::EnrichAdd,
            ButtonId::ConfirmPublish,
            ButtonId::ConfirmEdit,
            ButtonId::ConfirmCancel,
        ] {
            let s = id.to_string();
            assert_eq!(ButtonId::from_str(&s).unwrap(), id);
        }
        assert_eq!(
            ButtonId::from_str("enrich_publish").unwrap(),
            ButtonId::EnrichPublish
        );
        assert!(ButtonId::from_str("not_a_button").is_err());
    }

    #[test]
    fn analysis_description_accessor() {
        let described = MediaAnalysis::Described {
            description: "a latte on a wooden table".into(),
            tags: vec!["coffee".into()],
            mood: "cozy".into(),
        };
        assert_eq!(
            described.description(),
            Some("a latte on a wooden table")
        );
        assert_eq!(MediaAnalysis::Unavailable.description(), None);
    }

    #[test]
    fn media_analysis_tagged_serialization() {
        let json = serde_json::to_string(&MediaAnalysis::Unavailable).unwrap();
        assert_eq!(json, r#"{"status":"unavailable"}"#);
    }
}
