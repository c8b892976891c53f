// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft composer: generative caption with a deterministic fallback.
//!
//! `compose` never fails and never returns an empty caption, so the
//! conversation can always enter the confirmation phase with
//! something to show.

use std::sync::Arc;
use std::time::Duration;

use postino_core::traits::CaptionGenerator;
use postino_core::types::MediaAnalysis;
use postino_core::PostinoError;

use crate::{bounded, record_fallback};

const FALLBACK_TAGS: &str = "#new #today #local";

/// Produces the draft caption shown for confirmation.
pub struct DraftComposer {
    generator: Arc<dyn CaptionGenerator>,
    adapter_timeout: Duration,
}

impl DraftComposer {
    pub fn new(generator: Arc<dyn CaptionGenerator>, adapter_timeout: Duration) -> Self {
        Self {
            generator,
            adapter_timeout,
        }
    }

    /// Generates a caption, falling back to [`fallback_caption`] on
    /// failure or an empty generation.
    pub async fn compose(
        &self,
        analyses: &[MediaAnalysis],
        user_note: &str,
        target_channels: &[String],
    ) -> String {
        let generated = bounded(
            self.adapter_timeout,
            self.generator.generate(analyses, user_note, target_channels),
        )
        .await;

        match generated {
            Ok(caption) if !caption.trim().is_empty() => caption.trim().to_string(),
            Ok(_) => {
                let e = PostinoError::Adapter {
                    message: "caption generator returned empty text".into(),
                    source: None,
                };
                record_fallback("caption", &e);
                fallback_caption(analyses, user_note)
            }
            Err(e) => {
                record_fallback("caption", &e);
                fallback_caption(analyses, user_note)
            }
        }
    }
}

/// Deterministic template caption: first available media description,
/// then the sender's note, then a fixed tag set. Never empty.
pub fn fallback_caption(analyses: &[MediaAnalysis], user_note: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(description) = analyses.iter().find_map(|a| a.description()) {
        parts.push(description.to_string());
    }
    if !user_note.trim().is_empty() {
        parts.push(user_note.trim().to_string());
    }
    if parts.is_empty() {
        parts.push("Something new from us today.".to_string());
    }

    format!("{}\n\n{}", parts.join("\n"), FALLBACK_TAGS)
}
