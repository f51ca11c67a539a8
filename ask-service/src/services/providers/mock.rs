//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Echo,
    Fail(String),
}

/// Deterministic text provider that records how often it was called.
pub struct MockTextProvider {
    reply: MockReply,
    healthy: bool,
    calls: AtomicUsize,
}

impl MockTextProvider {
    fn new(reply: MockReply) -> Self {
        Self {
            reply,
            healthy: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always completes with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Completes with the prompt itself.
    pub fn echoing() -> Self {
        Self::new(MockReply::Echo)
    }

    /// Always fails with a network error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(message.into()))
    }

    /// Make `health_check` report the provider as not configured.
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Number of `complete` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Echo => Ok(prompt.to_string()),
            MockReply::Fail(message) => Err(ProviderError::NetworkError(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
