// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration engine.
//!
//! The [`ConversationEngine`] receives one normalized inbound event at
//! a time, loads or creates the sender's conversation record, runs the
//! three-phase state machine (IDLE, ENRICHING, CONFIRMING), invokes
//! the intake adapters as needed, replies through the outbound
//! channel, and persists (or deletes) the record.
//!
//! Turns for the same sender are serialized through [`SenderGate`];
//! different senders run fully in parallel. Exactly one transition has
//! a durable side effect outside the store: the confirm action, which
//! is made idempotent through `pending_request_ids` (persisted in the
//! same logical step as emission, before deletion).

pub mod gate;
pub mod keywords;
pub mod replies;

use std::str::FromStr;
use std::sync::Arc;

use metrics::counter;
use postino_core::types::{
    normalize_sender_id, ButtonId, ConversationRecord, EventPayload, InboundEvent, MediaKind,
    Phase,
};
use postino_core::{OutboundChannel, PostinoError, PublishSink, SessionStore};
use postino_intake::{DraftComposer, MediaIntake, SpeechIntake};
use tracing::{debug, error, info, warn};

use crate::gate::SenderGate;
use crate::keywords::{control_keyword, ControlKeyword};

/// The conversation orchestration engine.
pub struct ConversationEngine {
    store: Arc<dyn SessionStore>,
    channel: Arc<dyn OutboundChannel>,
    sink: Arc<dyn PublishSink>,
    media: MediaIntake,
    speech: SpeechIntake,
    composer: DraftComposer,
    default_channels: Vec<String>,
    gate: SenderGate,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        channel: Arc<dyn OutboundChannel>,
        sink: Arc<dyn PublishSink>,
        media: MediaIntake,
        speech: SpeechIntake,
        composer: DraftComposer,
        default_channels: Vec<String>,
    ) -> Self {
        Self {
            store,
            channel,
            sink,
            media,
            speech,
            composer,
            default_channels,
            gate: SenderGate::new(),
        }
    }

    /// Processes one inbound event to completion: exactly one turn.
    ///
    /// Adapter failures never surface here; they degrade inside the
    /// intake layer. Errors from this method mean the store, the
    /// outbound channel, or publish emission failed; the caller should
    /// log them, and for publish failures the sender has already been
    /// told to retry.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), PostinoError> {
        let sender_id = normalize_sender_id(&event.sender_id);
        if sender_id.is_empty() {
            warn!("dropping inbound event with empty sender id");
            return Ok(());
        }

        // Single-flight per sender: the record is exclusively ours
        // until this guard drops.
        let _slot = self.gate.acquire(&sender_id).await;
        counter!("postino_turns_total").increment(1);

        let record = self.store.get(&sender_id).await?;
        debug!(
            sender_id = sender_id.as_str(),
            phase = ?record.as_ref().map(|r| r.phase),
            "handling inbound event"
        );

        match event.payload {
            EventPayload::Text { text } => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    debug!(sender_id = sender_id.as_str(), "ignoring empty text event");
                    return Ok(());
                }
                if let Some(keyword) = control_keyword(&text) {
                    return self.on_keyword(&sender_id, record, keyword).await;
                }
                self.on_text(&sender_id, record, text).await
            }
            EventPayload::Media {
                media_ref,
                kind,
                caption,
            } => self.on_media(&sender_id, record, &media_ref, kind, caption).await,
            EventPayload::Voice { media_ref } => {
                self.on_voice(&sender_id, record, &media_ref).await
            }
            EventPayload::Button { button_id } => {
                self.on_button(&sender_id, record, &button_id).await
            }
        }
    }

    /// Control keywords work the same in every phase.
    async fn on_keyword(
        &self,
        sender_id: &str,
        record: Option<ConversationRecord>,
        keyword: ControlKeyword,
    ) -> Result<(), PostinoError> {
        match keyword {
            ControlKeyword::Help => self.channel.send_text(sender_id, replies::HELP).await,
            ControlKeyword::Cancel => {
                if record.is_some() {
                    self.store.delete(sender_id).await?;
                    info!(sender_id, "conversation cancelled by sender");
                }
                self.channel.send_text(sender_id, replies::CANCELLED).await
            }
        }
    }

    async fn on_text(
        &self,
        sender_id: &str,
        record: Option<ConversationRecord>,
        text: String,
    ) -> Result<(), PostinoError> {
        match record {
            Some(rec) if rec.phase == Phase::Enriching => self.note_and_draft(rec, text).await,
            Some(rec) if rec.phase == Phase::Confirming => self.apply_edit(rec, text).await,
            _ => {
                // No conversation yet: no record is created for bare text.
                self.channel.send_text(sender_id, replies::PHOTO_FIRST).await
            }
        }
    }

    async fn on_voice(
        &self,
        sender_id: &str,
        record: Option<ConversationRecord>,
        media_ref: &str,
    ) -> Result<(), PostinoError> {
        let Some(mut rec) = record else {
            return self.channel.send_text(sender_id, replies::PHOTO_FIRST).await;
        };

        let transcript = self.speech.transcribe(media_ref).await;
        if transcript.is_empty() {
            // Degraded or silent note: keep the phase, refresh the
            // record, and ask for a retry.
            rec.touch();
            self.store.save(&rec).await?;
            return self.channel.send_text(sender_id, replies::VOICE_RETRY).await;
        }

        if let Some(keyword) = control_keyword(&transcript) {
            return self.on_keyword(sender_id, Some(rec), keyword).await;
        }

        match rec.phase {
            Phase::Enriching => self.note_and_draft(rec, transcript).await,
            Phase::Confirming => self.apply_edit(rec, transcript).await,
            Phase::Idle => self.channel.send_text(sender_id, replies::PHOTO_FIRST).await,
        }
    }

    async fn on_media(
        &self,
        sender_id: &str,
        record: Option<ConversationRecord>,
        media_ref: &str,
        kind: MediaKind,
        caption: Option<String>,
    ) -> Result<(), PostinoError> {
        let mut rec = match record {
            Some(rec) if rec.phase == Phase::Enriching => rec,
            Some(rec) if rec.phase == Phase::Confirming => {
                // New media during confirmation discards the previous
                // conversation entirely, draft and note included.
                info!(
                    sender_id,
                    old_conversation = rec.conversation_id.as_str(),
                    "new media while confirming, restarting conversation"
                );
                ConversationRecord::new(sender_id, self.default_channels.clone())
            }
            _ => ConversationRecord::new(sender_id, self.default_channels.clone()),
        };

        let item = self.media.ingest(media_ref, kind).await;
        rec.media_items.push(item);
        rec.phase = Phase::Enriching;

        // A caption delivered with the media acts as the sender's note:
        // media first, then the same transition a text message takes.
        if let Some(note) = caption.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
            return self.note_and_draft(rec, note).await;
        }

        rec.touch();
        let body = if rec.media_items.len() == 1 {
            replies::reaction(&rec.media_items[0].analysis)
        } else {
            replies::media_count(rec.media_items.len())
        };
        self.store.save(&rec).await?;
        self.channel
            .send_buttons(sender_id, &body, &replies::enrich_buttons(), None)
            .await
    }

    async fn on_button(
        &self,
        sender_id: &str,
        record: Option<ConversationRecord>,
        raw_button_id: &str,
    ) -> Result<(), PostinoError> {
        let Ok(button) = ButtonId::from_str(raw_button_id) else {
            debug!(sender_id, button_id = raw_button_id, "ignoring unknown button id");
            return Ok(());
        };

        match (record, button) {
            (Some(rec), ButtonId::EnrichPublish) if rec.phase == Phase::Enriching => {
                // Same transition as a text message with nothing to add.
                self.note_and_draft(rec, String::new()).await
            }
            (Some(mut rec), ButtonId::EnrichAdd) if rec.phase == Phase::Enriching => {
                rec.touch();
                self.store.save(&rec).await?;
                self.channel.send_text(sender_id, replies::ADD_DETAILS).await
            }
            (Some(rec), ButtonId::ConfirmPublish) if rec.phase == Phase::Confirming => {
                self.confirm_publish(rec).await
            }
            (Some(mut rec), ButtonId::ConfirmEdit) if rec.phase == Phase::Confirming => {
                rec.touch();
                self.store.save(&rec).await?;
                self.channel.send_text(sender_id, replies::EDIT_PROMPT).await
            }
            (Some(rec), ButtonId::ConfirmCancel) if rec.phase == Phase::Confirming => {
                self.store.delete(&rec.sender_id).await?;
                info!(sender_id, "conversation cancelled by sender");
                self.channel.send_text(sender_id, replies::CANCELLED).await
            }
            (record, button) => {
                // Stale button UI or an id for another phase: no state
                // change, no reply.
                debug!(
                    sender_id,
                    button = %button,
                    phase = ?record.map(|r| r.phase),
                    "ignoring button outside its phase"
                );
                Ok(())
            }
        }
    }

    /// ENRICHING -> CONFIRMING: set the note, compose a draft, preview it.
    async fn note_and_draft(
        &self,
        mut rec: ConversationRecord,
        note: String,
    ) -> Result<(), PostinoError> {
        rec.user_note = note;
        rec.draft_caption = self
            .composer
            .compose(&rec.analyses(), &rec.user_note, &rec.target_channels)
            .await;
        rec.phase = Phase::Confirming;
        rec.touch();
        self.store.save(&rec).await?;

        self.channel
            .send_buttons(
                &rec.sender_id,
                &replies::draft_preview(&rec.draft_caption),
                &replies::confirm_buttons(),
                Some(replies::DRAFT_HEADER),
            )
            .await
    }

    /// CONFIRMING -> CONFIRMING: fold the instruction into the note and
    /// regenerate the draft.
    async fn apply_edit(
        &self,
        mut rec: ConversationRecord,
        instruction: String,
    ) -> Result<(), PostinoError> {
        rec.user_note = if rec.user_note.is_empty() {
            instruction
        } else {
            format!("{}\n{}", rec.user_note, instruction)
        };
        rec.draft_caption = self
            .composer
            .compose(&rec.analyses(), &rec.user_note, &rec.target_channels)
            .await;
        rec.touch();
        self.store.save(&rec).await?;

        self.channel
            .send_buttons(
                &rec.sender_id,
                &replies::draft_preview(&rec.draft_caption),
                &replies::confirm_buttons(),
                Some(replies::UPDATED_DRAFT_HEADER),
            )
            .await
    }

    /// The terminal confirm transition, the only edge with a durable
    /// side effect outside the store.
    ///
    /// Emission order per record: emit to each target channel, persist
    /// the obtained request ids, then delete, then acknowledge. A
    /// record that already carries request ids skips emission, so a
    /// replayed confirm (double-tap, at-least-once delivery, crash
    /// between emission and deletion) never double-emits.
    async fn confirm_publish(&self, mut rec: ConversationRecord) -> Result<(), PostinoError> {
        if rec.pending_request_ids.is_empty() {
            let media_urls = rec.media_urls();
            let mut emitted: Vec<String> = Vec::new();

            for channel_name in &rec.target_channels {
                match self
                    .sink
                    .emit(
                        &rec.conversation_id,
                        channel_name,
                        &rec.draft_caption,
                        &media_urls,
                    )
                    .await
                {
                    Ok(request_id) => emitted.push(request_id),
                    Err(e) => {
                        error!(
                            sender_id = rec.sender_id.as_str(),
                            conversation_id = rec.conversation_id.as_str(),
                            channel = channel_name.as_str(),
                            error = %e,
                            "publish emission failed, keeping record for retry"
                        );
                        // Ids already obtained must survive the retry,
                        // or those channels would be emitted twice.
                        rec.pending_request_ids = emitted;
                        rec.touch();
                        self.store.save(&rec).await?;
                        self.channel
                            .send_text(&rec.sender_id, replies::PUBLISH_FAILED)
                            .await?;
                        return Err(e);
                    }
                }
            }

            counter!("postino_publish_requests_total").increment(emitted.len() as u64);
            info!(
                sender_id = rec.sender_id.as_str(),
                conversation_id = rec.conversation_id.as_str(),
                requests = emitted.len(),
                "publish requests emitted"
            );
            rec.pending_request_ids = emitted;
            rec.touch();
            self.store.save(&rec).await?;
        } else {
            debug!(
                conversation_id = rec.conversation_id.as_str(),
                "publish requests already emitted, skipping emission"
            );
        }

        self.store.delete(&rec.sender_id).await?;
        self.channel
            .send_text(&rec.sender_id, &replies::publish_ok(&rec.target_channels))
            .await
    }
}
