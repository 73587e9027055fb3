//! Mock backend for testing
//!
//! Returns canned replies without a running LLM server.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::CompletionRequest;
use super::AIBackend;

/// A well-formed insight reply (two recommendations, so parsing pads it)
pub const MOCK_INSIGHT_REPLY: &str = r#"Here is my analysis:
{
  "insights": [
    {"type": "success", "title": "Steady progress", "content": "You are keeping up well with most goals.", "priority": 4},
    {"type": "suggestion", "title": "Plan ahead", "content": "Schedule your hardest goal for the morning.", "priority": 3}
  ],
  "recommendations": [
    "Punch in at the same time every day",
    "Pair a new habit with an existing one"
  ],
  "motivationalMessage": "Every day counts. Keep going!"
}"#;

/// What the mock answers with
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockReply {
    #[default]
    Valid,
    /// Text with no JSON object in it
    Malformed,
    /// Fails as if the server were down
    Error,
    Custom(String),
}

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    pub reply: MockReply,
    /// Delay before answering
    pub delay: Option<Duration>,
}

impl MockBackend {
    /// Healthy mock returning a valid reply
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Unhealthy mock whose completions fail
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            reply: MockReply::Error,
            delay: None,
        }
    }

    pub fn with_reply(mut self, reply: MockReply) -> Self {
        self.reply = reply;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// No-op for mock
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            MockReply::Valid => Ok(MOCK_INSIGHT_REPLY.to_string()),
            MockReply::Malformed => Ok("I think you are doing great, keep it up!".to_string()),
            MockReply::Error => Err(Error::GeneratorUnavailable(
                "mock backend is unavailable".into(),
            )),
            MockReply::Custom(text) => Ok(text.clone()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
