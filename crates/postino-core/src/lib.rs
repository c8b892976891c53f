// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Postino content-intake pipeline.
//!
//! Provides the error type, the domain model (inbound events, media
//! analyses, the conversation record), and the adapter traits every
//! external collaborator implements. Implementation crates depend on
//! this one and never on each other's internals.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PostinoError;
pub use types::{
    normalize_sender_id, Button, ButtonId, ConversationRecord, EventPayload, FetchedMedia,
    InboundEvent, MediaAnalysis, MediaItem, MediaKind, Phase, StoredObject, VisionInsight,
};

pub use traits::{
    CaptionGenerator, MediaFetcher, ObjectStore, OutboundChannel, PublishSink, SessionStore,
    SpeechTranscriber, VisionAnalyzer, MAX_BUTTONS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = PostinoError::Config("test".into());
        let _store = PostinoError::Store {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = PostinoError::Channel {
            message: "test".into(),
            source: None,
        };
        let _adapter = PostinoError::Adapter {
            message: "test".into(),
            source: None,
        };
        let _publish = PostinoError::Publish {
            message: "test".into(),
            source: None,
        };
        let _timeout = PostinoError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _internal = PostinoError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that every adapter seam is reachable
        // through the public API.
        fn _assert_channel<T: OutboundChannel>() {}
        fn _assert_sink<T: PublishSink>() {}
        fn _assert_fetcher<T: MediaFetcher>() {}
        fn _assert_object_store<T: ObjectStore>() {}
        fn _assert_vision<T: VisionAnalyzer>() {}
        fn _assert_speech<T: SpeechTranscriber>() {}
        fn _assert_caption<T: CaptionGenerator>() {}
        fn _assert_store<T: SessionStore>() {}
    }
}
