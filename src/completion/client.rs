//! HTTP client for the external completion service.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, CompletionError};

/// Returned when the service produces a choice without text content.
pub const NO_RESPONSE_FALLBACK: &str = "No response.";

/// Interface implemented by completion backends.
///
/// The service layer holds a boxed instance so tests can substitute a fake
/// without touching the network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a reply for the finalized message list and return its text.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError>;
}

/// Completion client for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct OpenAiCompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompletionClient {
    /// Construct a client against an explicit endpoint and credential.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent("docchat/0.1")
            .build()
            .expect("Failed to construct reqwest::Client for completions");
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Construct a client using configuration derived from the environment.
    pub fn from_config() -> Self {
        let config = get_config();
        tracing::debug!(
            base_url = %config.openai_base_url,
            model = %config.completion_model,
            "Initialized completion client"
        );
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let payload = CompletionRequest { model, messages };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                CompletionError::ServiceUnavailable(format!(
                    "failed to reach completion service at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = CompletionError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Completion request failed");
            return Err(error);
        }

        let body: CompletionResponse = response.json().await.map_err(|error| {
            CompletionError::InvalidResponse(format!(
                "failed to decode completion response: {error}"
            ))
        })?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());

        tracing::debug!(reply_chars = reply.len(), "Completion received");
        Ok(reply)
    }
}
