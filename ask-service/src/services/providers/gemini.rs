//! Gemini AI provider implementation.
//!
//! Single-shot text generation against the Gemini `generateContent` REST
//! endpoint.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Finish reasons for which the candidate text must not be returned.
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: Secret<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    /// The client carries no request timeout; the upstream's own limits apply.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        let key = self.config.api_key.expose_secret();
        if key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(key)
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        completion_text(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }
}

/// Text of the first candidate, all text parts joined in order.
///
/// A reply with neither candidates nor prompt feedback completes to `""`.
fn completion_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback {
            Some(feedback) => Err(ProviderError::ContentBlocked(format!(
                "prompt blocked: {}",
                feedback.block_reason.as_deref().unwrap_or("unspecified")
            ))),
            None => Ok(String::new()),
        };
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::ContentBlocked(format!(
                "candidate finished with {}",
                reason
            )));
        }
    }

    Ok(candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Non-text parts (inline data, function calls) deserialize with `text: None`.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const MODEL: &str = "gemini-1.5-flash";
    const PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn provider_for(server: &MockServer, api_key: &str) -> GeminiTextProvider {
        let config = GeminiConfig::new(Secret::new(api_key.to_string()), MODEL)
            .with_base_url(server.base_url());
        GeminiTextProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn sends_prompt_with_api_key_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path(PATH)
                .header("x-goog-api-key", "test-key")
                .json_body(json!({
                    "contents": [{"role": "user", "parts": [{"text": "What is 2+2?"}]}]
                }));
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "4"}]},
                    "finishReason": "STOP"
                }]
            }));
        });

        let answer = provider_for(&server, "test-key")
            .complete("What is 2+2?")
            .await
            .unwrap();

        assert_eq!(answer, "4");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn joins_all_text_parts_of_first_candidate() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200).json_body(json!({
                "candidates": [
                    {"content": {"parts": [{"text": "Hello, "}, {"inlineData": {"mimeType": "image/png", "data": ""}}, {"text": "world"}]}},
                    {"content": {"parts": [{"text": "ignored"}]}}
                ]
            }));
        });

        let answer = provider_for(&server, "k").complete("hi").await.unwrap();
        assert_eq!(answer, "Hello, world");
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(429).body("quota exceeded");
        });

        let err = provider_for(&server, "k").complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(403).body("API key not valid");
        });

        let err = provider_for(&server, "bad").complete("hi").await.unwrap_err();
        match err {
            ProviderError::ApiError(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200).body("<html>not json</html>");
        });

        let err = provider_for(&server, "k").complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError(_)));
    }

    #[tokio::test]
    async fn blocked_prompt_is_content_blocked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200)
                .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        });

        let err = provider_for(&server, "k").complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::ContentBlocked(_)));
    }

    #[tokio::test]
    async fn safety_finish_reason_is_content_blocked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "partial"}]}, "finishReason": "SAFETY"}]
            }));
        });

        let err = provider_for(&server, "k").complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::ContentBlocked(_)));
    }

    #[tokio::test]
    async fn bare_reply_completes_to_empty_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200).json_body(json!({}));
        });

        let answer = provider_for(&server, "k").complete("hi").await.unwrap();
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn other_finish_reasons_keep_candidate_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "cut off"}]}, "finishReason": "MAX_TOKENS"}]
            }));
        });

        let answer = provider_for(&server, "k").complete("hi").await.unwrap();
        assert_eq!(answer, "cut off");
    }

    #[tokio::test]
    async fn missing_api_key_never_reaches_upstream() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path(PATH);
            then.status(200);
        });

        let provider = provider_for(&server, "  ");
        let err = provider.complete("hi").await.unwrap_err();

        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(provider.health_check().await.is_err());
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_network_error() {
        let config = GeminiConfig::new(Secret::new("k".to_string()), MODEL)
            .with_base_url("http://127.0.0.1:1");
        let provider = GeminiTextProvider::new(config).unwrap();

        let err = provider.complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::NetworkError(_)));
    }

    #[tokio::test]
    async fn health_check_passes_with_api_key() {
        let server = MockServer::start();
        assert!(provider_for(&server, "k").health_check().await.is_ok());
    }

    #[test]
    fn api_url_tolerates_trailing_slash() {
        let config = GeminiConfig::new(Secret::new("k".to_string()), MODEL)
            .with_base_url("http://localhost:9999/v1beta/");
        let provider = GeminiTextProvider::new(config).unwrap();
        assert_eq!(
            provider.api_url("generateContent"),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
