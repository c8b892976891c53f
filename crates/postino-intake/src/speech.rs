// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech intake: download and transcribe a voice note.
//!
//! `transcribe` never fails; anything that goes wrong comes back as an
//! empty transcript, which the engine answers with a retry prompt.

use std::sync::Arc;
use std::time::Duration;

use postino_core::traits::{MediaFetcher, SpeechTranscriber};
use tracing::debug;

use crate::{bounded, record_fallback};

/// Turns a transport voice reference into text.
pub struct SpeechIntake {
    fetcher: Arc<dyn MediaFetcher>,
    transcriber: Arc<dyn SpeechTranscriber>,
    fetch_timeout: Duration,
    adapter_timeout: Duration,
}

impl SpeechIntake {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        transcriber: Arc<dyn SpeechTranscriber>,
        fetch_timeout: Duration,
        adapter_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            transcriber,
            fetch_timeout,
            adapter_timeout,
        }
    }

    /// Fetches and transcribes a voice note. Empty string on any failure.
    pub async fn transcribe(&self, media_ref: &str) -> String {
        let fetched = match bounded(self.fetch_timeout, self.fetcher.fetch(media_ref)).await {
            Ok(fetched) => fetched,
            Err(e) => {
                record_fallback("voice_fetch", &e);
                return String::new();
            }
        };

        match bounded(self.adapter_timeout, self.transcriber.transcribe(&fetched)).await {
            Ok(text) => {
                let text = text.trim().to_string();
                debug!(media_ref, chars = text.len(), "voice note transcribed");
                text
            }
            Err(e) => {
                record_fallback("transcription", &e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postino_test_utils::{StubFetcher, StubTranscriber};

    fn intake(fetcher: StubFetcher, transcriber: StubTranscriber) -> SpeechIntake {
        SpeechIntake::new(
            Arc::new(fetcher),
            Arc::new(transcriber),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn successful_transcription_is_trimmed() {
        let intake = intake(
            StubFetcher::new(),
            StubTranscriber::with_transcript("  12 euros each  "),
        );
        assert_eq!(intake.transcribe("voice-1").await, "12 euros");
    }

    #[tokio::test]
    async fn fetch_failure_yields_empty() {
        let intake = intake(
            StubFetcher::failing(),
            StubTranscriber::with_transcript("unused"),
        );
        assert_eq!(intake.transcribe("voice-1").await, "");
    }

    #[tokio::test]
    async fn transcription_failure_yields_empty() {
        let intake = intake(StubFetcher::new(), StubTranscriber::failing());
        assert_eq!(intake.transcribe("voice-1").await, "");
    }

    #[tokio::test]
    async fn silent_note_yields_empty() {
        let intake = intake(StubFetcher::new(), StubTranscriber::empty());
        assert_eq!(intake.transcribe("voice-1").await, "");
    }
}
