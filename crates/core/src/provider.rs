//! Provider trait: the abstraction over the completion endpoint.
//!
//! A Provider sends one prompt to an LLM as a single user message and
//! returns the completion text. One attempt, no streaming, no retry.
//!
//! Implementations: OpenAI-compatible Chat Completions, OpenAI Responses API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "kimi-k2.5", "gpt-4o-mini")
    pub model: String,

    /// The full instruction text, sent as the only user message
    pub prompt: String,
}

impl ProviderRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The completion text, trimmed and non-empty
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The router calls `complete()` without knowing which wire shape is in
/// use; the variant is chosen once, from configuration.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "chat_completions").
    fn name(&self) -> &str;

    /// Send the prompt and get the completion text.
    ///
    /// Errors: `AuthenticationFailed` when no credential is available,
    /// `Network` when the request cannot be completed, `ApiError` when the
    /// endpoint reports an error, `EmptyResponse` when it returns no text.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                content: request.prompt,
                model: request.model,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn provider_is_object_safe() {
        let provider: Box<dyn Provider> = Box::new(EchoProvider);
        let response = provider
            .complete(ProviderRequest::new("m", "hello"))
            .await
            .unwrap();
        assert_eq!(provider.name(), "echo");
        assert_eq!(response.content, "hello");
        assert_eq!(response.model, "m");
    }

    #[test]
    fn response_skips_missing_usage() {
        let response = ProviderResponse {
            content: "{}".into(),
            model: "m".into(),
            usage: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("usage"));
    }
}
