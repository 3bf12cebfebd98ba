//! Mock provider implementation for tests and local runs.

use super::{GenerativeModel, ProviderError, StructuredPrompt};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock answers with.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(ProviderError),
}

/// Mock model returning a scripted reply and recording every call.
pub struct MockModel {
    reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<StructuredPrompt>>,
}

impl MockModel {
    /// Reply with `value` serialized as JSON.
    pub fn replying(value: serde_json::Value) -> Self {
        Self::replying_text(value.to_string())
    }

    /// Reply with raw text, which need not be valid JSON.
    pub fn replying_text(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_reply(MockReply::Error(error))
    }

    /// A canned product description, used when the service runs with `GENAI_PROVIDER=mock`.
    pub fn demo() -> Self {
        Self::replying(json!({
            "name": "Hand-Thrown Stoneware Mug",
            "description": "A sturdy stoneware mug shaped on the wheel and finished in a speckled glaze.",
            "recommendations": []
        }))
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate_structured` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt from the most recent call.
    pub fn last_prompt(&self) -> Option<StructuredPrompt> {
        self.last_prompt
            .lock()
            .ok()
            .and_then(|prompt| prompt.clone())
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Error(error) => Err(error.clone()),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.reply {
            MockReply::Error(ProviderError::NotConfigured(msg)) => {
                Err(ProviderError::NotConfigured(msg.clone()))
            }
            _ => Ok(()),
        }
    }
}
