//! OpenAI-compatible Chat Completions provider.
//!
//! Works with: OpenAI, Moonshot, OpenRouter, Groq, DeepSeek, Ollama, vLLM,
//! and any endpoint exposing `POST {base_url}/chat/completions`.
//!
//! The prompt goes out as a single user message; the first choice's text
//! comes back. No streaming, no tools, no retry.

use std::time::Duration;

use async_trait::async_trait;
use ctxroute_core::error::ProviderError;
use ctxroute_core::provider::*;
use serde::Deserialize;
use tracing::debug;

use crate::http;

/// A Chat Completions provider.
pub struct OpenAiCompatProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new provider. `api_key` may be absent; `complete()` then
    /// fails with `AuthenticationFailed` without touching the network.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: http::build_client(None),
        }
    }

    /// Apply a transport-level request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http::build_client(Some(timeout));
        self
    }

    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "stream": false,
        })
    }

    fn into_response(api: ApiResponse, requested_model: &str) -> Result<ProviderResponse, ProviderError> {
        let choice = api
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("LLM returned no choices".into()))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default()
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse("LLM returned empty response".into()));
        }

        Ok(ProviderResponse {
            content,
            model: api.model.unwrap_or_else(|| requested_model.to_string()),
            usage: api.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "chat_completions"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let api_key = http::require_api_key(&self.api_key)?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(provider = self.name(), model = %request.model, "Sending completion request");

        let response =
            http::post_json(&self.client, &url, api_key, &Self::request_body(&request)).await?;

        let api_response: ApiResponse = response.json().await.map_err(http::body_error)?;

        let response = Self::into_response(api_response, &request.model)?;
        debug!(model = %response.model, usage = ?response.usage, "Completion received");
        Ok(response)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
