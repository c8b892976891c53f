// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local adapters for the interactive shell.
//!
//! These stand in for the production collaborators: media references
//! are file paths, object storage is a directory, the "vision" and
//! "caption" calls are deterministic previews, and publish requests
//! are logged instead of scheduled. The engine cannot tell the
//! difference, which is the point.

use std::path::PathBuf;

use async_trait::async_trait;
use colored::Colorize;
use postino_core::traits::{
    CaptionGenerator, MediaFetcher, ObjectStore, OutboundChannel, PublishSink,
    SpeechTranscriber, VisionAnalyzer,
};
use postino_core::types::{
    Button, FetchedMedia, MediaAnalysis, StoredObject, VisionInsight,
};
use postino_core::PostinoError;
use tracing::info;

/// Reads media references as local file paths.
pub struct FileMediaFetcher;

#[async_trait]
impl MediaFetcher for FileMediaFetcher {
    async fn fetch(&self, media_ref: &str) -> Result<FetchedMedia, PostinoError> {
        let bytes = tokio::fs::read(media_ref)
            .await
            .map_err(|e| PostinoError::Adapter {
                message: format!("failed to read {media_ref}: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(FetchedMedia {
            bytes,
            mime_type: mime_for_path(media_ref).to_string(),
        })
    }
}

fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "mp4" => "video/mp4",
        Some(ext) if ext == "ogg" => "audio/ogg",
        Some(ext) if ext == "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Writes media bytes into a local directory tree.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _mime_type: &str,
    ) -> Result<StoredObject, PostinoError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PostinoError::Adapter {
                    message: format!("failed to create {}: {e}", parent.display()),
                    source: Some(Box::new(e)),
                })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PostinoError::Adapter {
                message: format!("failed to write {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?;

        Ok(StoredObject {
            url: format!("file://{}", path.display()),
            key: key.to_string(),
        })
    }
}

/// Deterministic stand-in for a vision provider.
pub struct PreviewVision;

#[async_trait]
impl VisionAnalyzer for PreviewVision {
    async fn describe(&self, media: &FetchedMedia) -> Result<VisionInsight, PostinoError> {
        let kb = media.bytes.len().div_ceil(1024);
        Ok(VisionInsight {
            description: format!("a local photo ({}, {kb} KB)", media.mime_type),
            tags: vec!["local".to_string(), "preview".to_string()],
            mood: "neutral".to_string(),
        })
    }
}

/// Treats plain-text files as "voice notes" so the transcription path
/// can be exercised without an audio backend; real audio degrades to
/// the empty-transcript fallback.
pub struct SidecarTranscriber;

#[async_trait]
impl SpeechTranscriber for SidecarTranscriber {
    async fn transcribe(&self, media: &FetchedMedia) -> Result<String, PostinoError> {
        if media.mime_type == "text/plain" {
            return Ok(String::from_utf8_lossy(&media.bytes).into_owned());
        }
        Err(PostinoError::Adapter {
            message: "no transcription backend configured in the shell".to_string(),
            source: None,
        })
    }
}

/// Deterministic stand-in for a generative caption provider.
pub struct TemplateCaptioner;

#[async_trait]
impl CaptionGenerator for TemplateCaptioner {
    async fn generate(
        &self,
        analyses: &[MediaAnalysis],
        user_note: &str,
        _target_channels: &[String],
    ) -> Result<String, PostinoError> {
        let mut lines: Vec<String> = Vec::new();
        if let Some(description) = analyses.iter().find_map(|a| a.description()) {
            lines.push(format!("Take a look: {description}."));
        }
        if !user_note.trim().is_empty() {
            lines.push(user_note.trim().to_string());
        }
        if lines.is_empty() {
            lines.push("Here's what we've been up to today.".to_string());
        }
        lines.push("#postino #preview".to_string());
        Ok(lines.join("\n"))
    }
}

/// Logs publish requests instead of scheduling them.
pub struct LoggingPublishSink;

#[async_trait]
impl PublishSink for LoggingPublishSink {
    async fn emit(
        &self,
        conversation_id: &str,
        channel: &str,
        caption: &str,
        media_urls: &[String],
    ) -> Result<String, PostinoError> {
        let request_id = format!("local-{}", uuid::Uuid::new_v4());
        info!(
            conversation_id,
            channel,
            request_id = request_id.as_str(),
            media = media_urls.len(),
            "publish request (local sink)"
        );
        println!(
            "{} {channel}: {}",
            "[queued]".magenta().bold(),
            caption.lines().next().unwrap_or_default()
        );
        Ok(request_id)
    }
}

/// Prints engine replies to the terminal.
pub struct ShellChannel;

#[async_trait]
impl OutboundChannel for ShellChannel {
    async fn send_text(&self, _sender_id: &str, text: &str) -> Result<(), PostinoError> {
        println!("{} {text}", "postino>".green().bold());
        Ok(())
    }

    async fn send_buttons(
        &self,
        _sender_id: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
    ) -> Result<(), PostinoError> {
        if let Some(header) = header {
            println!("{}", header.dimmed());
        }
        println!("{} {body}", "postino>".green().bold());
        for button in buttons {
            println!("  {} {}", format!("[/tap {}]", button.id).yellow(), button.title);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_guesses_common_extensions() {
        assert_eq!(mime_for_path("a/b/photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_path("clip.mp4"), "video/mp4");
        assert_eq!(mime_for_path("note.txt"), "text/plain");
        assert_eq!(mime_for_path("mystery"), "application/octet-stream");
    }

    #[tokio::test]
    async fn local_object_store_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_path_buf());
        let stored = store
            .put("image/test.jpg", b"bytes", "image/jpeg")
            .await
            .unwrap();
        assert!(stored.url.starts_with("file://"));
        assert!(dir.path().join("image/test.jpg").exists());
    }

    #[tokio::test]
    async fn sidecar_transcriber_reads_text_only() {
        let transcriber = SidecarTranscriber;
        let text_media = FetchedMedia {
            bytes: b"two for five".to_vec(),
            mime_type: "text/plain".to_string(),
        };
        assert_eq!(
            transcriber.transcribe(&text_media).await.unwrap(),
            "two for five"
        );

        let audio_media = FetchedMedia {
            bytes: vec![0, 1, 2],
            mime_type: "audio/ogg".to_string(),
        };
        assert!(transcriber.transcribe(&audio_media).await.is_err());
    }
}
