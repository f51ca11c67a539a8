//! Upstream text-completion providers.
//!
//! The rest of the service only sees [`TextProvider`]; the Gemini wire types
//! never leave the `gemini` module. `mock` is a deterministic stand-in for
//! tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Single-shot text completion.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Complete `prompt`, returning the model's text.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Cheap local check that the provider can serve requests.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
