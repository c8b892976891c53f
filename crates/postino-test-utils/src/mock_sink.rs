// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock publish-request sink with scriptable failures.

use async_trait::async_trait;
use tokio::sync::Mutex;

use postino_core::traits::sink::PublishSink;
use postino_core::PostinoError;

/// One recorded emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub conversation_id: String,
    pub channel: String,
    pub caption: String,
    pub media_urls: Vec<String>,
    pub request_id: String,
}

/// A mock publish sink that records emissions and can be scripted to
/// fail from the Nth call onward.
pub struct MockPublishSink {
    emissions: Mutex<Vec<Emission>>,
    fail_from: Option<usize>,
}

impl MockPublishSink {
    /// A sink where every emission succeeds.
    pub fn new() -> Self {
        Self {
            emissions: Mutex::new(Vec::new()),
            fail_from: None,
        }
    }

    /// A sink that succeeds for the first `n` emissions, then fails.
    pub fn failing_from(n: usize) -> Self {
        Self {
            emissions: Mutex::new(Vec::new()),
            fail_from: Some(n),
        }
    }

    pub async fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().await.clone()
    }

    pub async fn emission_count(&self) -> usize {
        self.emissions.lock().await.len()
    }
}

impl Default for MockPublishSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PublishSink for MockPublishSink {
    async fn emit(
        &self,
        conversation_id: &str,
        channel: &str,
        caption: &str,
        media_urls: &[String],
    ) -> Result<String, PostinoError> {
        let mut emissions = self.emissions.lock().await;
        if let Some(n) = self.fail_from
            && emissions.len() >= n
        {
            return Err(PostinoError::Publish {
                message: format!("scripted failure for channel {channel}"),
                source: None,
            });
        }

        let request_id = format!("req-{}", uuid::Uuid::new_v4());
        emissions.push(Emission {
            conversation_id: conversation_id.to_string(),
            channel: channel.to_string(),
            caption: caption.to_string(),
            media_urls: media_urls.to_vec(),
            request_id: request_id.clone(),
        });
        Ok(request_id)
    }
}
