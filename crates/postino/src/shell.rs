// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postino shell` command implementation.
//!
//! Drives the full conversation engine from a readline REPL: plain
//! lines are text events, `/photo`, `/video`, and `/voice` send local
//! files as media, `/tap` presses a reply button. Uses the configured
//! session store, so a sqlite-backed conversation survives restarting
//! the shell.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use postino_config::PostinoConfig;
use postino_core::types::{InboundEvent, MediaKind};
use postino_core::{PostinoError, SessionStore};
use postino_engine::ConversationEngine;
use postino_intake::{DraftComposer, MediaIntake, SpeechIntake};
use postino_session::{DegradingStore, MemorySessionStore, SqliteSessionStore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

use crate::local::{
    FileMediaFetcher, LocalObjectStore, LoggingPublishSink, PreviewVision, ShellChannel,
    SidecarTranscriber, TemplateCaptioner,
};

/// The single simulated sender of the shell session.
const SHELL_SENDER: &str = "local-shell";

/// Runs the interactive shell against the configured session store.
pub async fn run_shell(config: PostinoConfig) -> Result<(), PostinoError> {
    let ttl = Duration::from_secs(config.session.ttl_secs);
    let store = build_store(&config, ttl).await?;
    let engine = build_engine(&config, store);

    let mut rl = DefaultEditor::new()
        .map_err(|e| PostinoError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "postino shell".bold().green());
    println!(
        "Plain text is a message. {} sends a photo, {} a video, {} a voice note \
         (point it at a .txt file to simulate a transcript), {} taps a button. {} to exit.\n",
        "/photo <path>".yellow(),
        "/video <path>".yellow(),
        "/voice <path>".yellow(),
        "/tap <button-id>".yellow(),
        "/quit".yellow(),
    );

    let prompt = format!("{}> ", "you".cyan());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let Some(event) = parse_line(trimmed) else {
                    eprintln!(
                        "{}: unknown command, try /photo, /video, /voice, /tap or /quit",
                        "error".red()
                    );
                    continue;
                };

                if let Err(e) = engine.handle_event(event).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Wires the engine with the local shell adapters.
fn build_engine(config: &PostinoConfig, store: Arc<dyn SessionStore>) -> ConversationEngine {
    let fetch_timeout = Duration::from_secs(config.intake.fetch_timeout_secs);
    let adapter_timeout = Duration::from_secs(config.intake.adapter_timeout_secs);

    let fetcher = Arc::new(FileMediaFetcher);
    let media = MediaIntake::new(
        fetcher.clone(),
        Arc::new(LocalObjectStore::new(media_root())),
        Arc::new(PreviewVision),
        fetch_timeout,
        adapter_timeout,
    );
    let speech = SpeechIntake::new(
        fetcher,
        Arc::new(SidecarTranscriber),
        fetch_timeout,
        adapter_timeout,
    );
    let composer = DraftComposer::new(Arc::new(TemplateCaptioner), adapter_timeout);

    ConversationEngine::new(
        store,
        Arc::new(ShellChannel),
        Arc::new(LoggingPublishSink),
        media,
        speech,
        composer,
        config.publish.default_channels.clone(),
    )
}

/// Builds the session store the config asks for, honoring the
/// degradation setting when the sqlite backend cannot be opened.
async fn build_store(
    config: &PostinoConfig,
    ttl: Duration,
) -> Result<Arc<dyn SessionStore>, PostinoError> {
    if config.session.store == "memory" {
        info!("using in-process session store");
        return Ok(Arc::new(MemorySessionStore::new(ttl)));
    }

    if let Some(parent) = Path::new(&config.session.database_path).parent() {
        let _ = tokio::fs::create_dir_all(parent).await;
    }

    match SqliteSessionStore::open(&config.session.database_path, ttl).await {
        Ok(store) => {
            info!(
                path = config.session.database_path.as_str(),
                "using sqlite session store"
            );
            let shared: Arc<dyn SessionStore> = Arc::new(store);
            if config.session.allow_degraded {
                Ok(Arc::new(DegradingStore::new(shared, ttl)))
            } else {
                Ok(shared)
            }
        }
        Err(e) if config.session.allow_degraded => {
            warn!(error = %e, "sqlite store unavailable, starting on in-process store");
            Ok(Arc::new(MemorySessionStore::new(ttl)))
        }
        Err(e) => Err(e),
    }
}

fn media_root() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("postino").join("media"))
        .unwrap_or_else(|| PathBuf::from("postino-media"))
}

/// Maps a shell line to an inbound event.
fn parse_line(line: &str) -> Option<InboundEvent> {
    if let Some(path) = line.strip_prefix("/photo ") {
        Some(InboundEvent::media(SHELL_SENDER, path.trim(), MediaKind::Image))
    } else if let Some(path) = line.strip_prefix("/video ") {
        Some(InboundEvent::media(SHELL_SENDER, path.trim(), MediaKind::Video))
    } else if let Some(path) = line.strip_prefix("/voice ") {
        Some(InboundEvent::voice(SHELL_SENDER, path.trim()))
    } else if let Some(id) = line.strip_prefix("/tap ") {
        Some(InboundEvent::button(SHELL_SENDER, id.trim()))
    } else if line.starts_with('/') {
        None
    } else {
        Some(InboundEvent::text(SHELL_SENDER, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postino_core::types::EventPayload;

    #[test]
    fn plain_text_is_a_text_event() {
        let event = parse_line("12 euros").unwrap();
        assert!(matches!(event.payload, EventPayload::Text { text } if text == "12 euros"));
    }

    #[test]
    fn photo_command_is_an_image_event() {
        let event = parse_line("/photo ./pic.jpg").unwrap();
        assert!(matches!(
            event.payload,
            EventPayload::Media { media_ref, kind: MediaKind::Image, .. } if media_ref == "./pic.jpg"
        ));
    }

    #[test]
    fn tap_command_is_a_button_event() {
        let event = parse_line("/tap confirm_publish").unwrap();
        assert!(matches!(
            event.payload,
            EventPayload::Button { button_id } if button_id == "confirm_publish"
        ));
    }

    #[test]
    fn unknown_slash_command_is_rejected() {
        assert!(parse_line("/frobnicate now").is_none());
    }
}
