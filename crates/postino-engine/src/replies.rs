// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply copy and button sets.
//!
//! All outbound text is deterministic: templates parameterized by
//! analysis results and counts, no generative calls.

use postino_core::types::{Button, ButtonId, MediaAnalysis};

pub const HELP: &str = "Send me a photo of what you want to post. I'll put a caption \
together, you can add details like price or opening hours, and nothing goes out \
until you hit Publish. Type \"cancel\" anytime to start over.";

pub const PHOTO_FIRST: &str =
    "Send me a photo first and I'll build the post around it.";

pub const CANCELLED: &str =
    "Okay, I've dropped that draft. Send a photo whenever you want to start a new post.";

pub const VOICE_RETRY: &str =
    "I couldn't make out that voice note. Try again, or just type it?";

pub const ADD_DETAILS: &str = "Sure, tell me more: price, opening hours, a promotion, \
anything that should go in the post.";

pub const EDIT_PROMPT: &str =
    "What should I change? Describe the edit and I'll redo the caption.";

pub const PUBLISH_FAILED: &str = "Something went wrong while scheduling your post. \
Nothing was lost, tap Publish to try again.";

pub const DRAFT_HEADER: &str = "Draft ready";
pub const UPDATED_DRAFT_HEADER: &str = "Updated draft";

/// Reaction to the first photo of a conversation.
pub fn reaction(analysis: &MediaAnalysis) -> String {
    match analysis.description() {
        Some(description) => format!(
            "Nice shot! I can see {description}. Publish right away, or add some details first?"
        ),
        None => {
            "Got your photo! Publish right away, or add some details first?".to_string()
        }
    }
}

/// Acknowledgment for each further media item.
pub fn media_count(count: usize) -> String {
    format!("Added! That's {count} pieces of media for this post. Publish now, or keep going?")
}

/// Body shown with the confirm buttons.
pub fn draft_preview(caption: &str) -> String {
    format!("Here's your draft:\n\n{caption}")
}

/// Success acknowledgment after publish requests were handed off.
pub fn publish_ok(channels: &[String]) -> String {
    format!("Done! Your post is queued for {}.", channels.join(", "))
}

/// Buttons offered while enriching.
pub fn enrich_buttons() -> Vec<Button> {
    vec![
        Button::new(ButtonId::EnrichPublish, "Publish now"),
        Button::new(ButtonId::EnrichAdd, "Add details"),
    ]
}

/// Buttons offered with a draft preview.
pub fn confirm_buttons() -> Vec<Button> {
    vec![
        Button::new(ButtonId::ConfirmPublish, "Publish"),
        Button::new(ButtonId::ConfirmEdit, "Edit"),
        Button::new(ButtonId::ConfirmCancel, "Cancel"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use postino_core::MAX_BUTTONS;

    #[test]
    fn button_sets_fit_the_transport_limit() {
        assert!(enrich_buttons().len() <= MAX_BUTTONS);
        assert!(confirm_buttons().len() <= MAX_BUTTONS);
    }

    #[test]
    fn reaction_uses_description_when_available() {
        let analysis = MediaAnalysis::Described {
            description: "a window display of cakes".into(),
            tags: vec![],
            mood: "bright".into(),
        };
        assert!(reaction(&analysis).contains("a window display of cakes"));
        assert!(!reaction(&MediaAnalysis::Unavailable).contains("I can see"));
    }

    #[test]
    fn draft_preview_embeds_caption() {
        assert!(draft_preview("my caption").contains("my caption"));
    }

    #[test]
    fn publish_ok_lists_channels() {
        let msg = publish_ok(&["instagram".into(), "facebook".into()]);
        assert!(msg.contains("instagram, facebook"));
    }
}
