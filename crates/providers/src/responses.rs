//! OpenAI Responses API provider (`POST {base_url}/responses`).
//!
//! Same contract as the Chat Completions provider, different wire shape:
//! the prompt is sent as `input` with medium reasoning effort, and the text
//! is assembled from the `output_text` parts of the `message` output items.

use std::time::Duration;

use async_trait::async_trait;
use ctxroute_core::error::ProviderError;
use ctxroute_core::provider::*;
use serde::Deserialize;
use tracing::debug;

use crate::http;

pub struct ResponsesProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ResponsesProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: http::build_client(None),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http::build_client(Some(timeout));
        self
    }

    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "input": request.prompt,
            "reasoning": { "effort": "medium" },
        })
    }

    fn into_response(api: ResponsesApiResponse, requested_model: &str) -> Result<ProviderResponse, ProviderError> {
        let content = api.output_text().trim().to_string();
        if content.is_empty() {
            return Err(ProviderError::EmptyResponse("LLM returned empty response".into()));
        }

        Ok(ProviderResponse {
            content,
            model: api.model.unwrap_or_else(|| requested_model.to_string()),
            usage: api.usage.map(|u| Usage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl Provider for ResponsesProvider {
    fn name(&self) -> &str {
        "responses"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let api_key = http::require_api_key(&self.api_key)?;
        let url = format!("{}/responses", self.base_url);

        debug!(provider = self.name(), model = %request.model, "Sending responses request");

        let response =
            http::post_json(&self.client, &url, api_key, &Self::request_body(&request)).await?;

        let api_response: ResponsesApiResponse = response.json().await.map_err(http::body_error)?;

        Self::into_response(api_response, &request.model)
    }
}

// --- Responses API types (internal) ---

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    output: Option<Vec<OutputItem>>,
    /// Convenience aggregate some gateways include
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

impl ResponsesApiResponse {
    fn output_text(&self) -> String {
        if let Some(text) = self.output_text.as_deref()
            && !text.trim().is_empty()
        {
            return text.to_string();
        }

        self.output
            .iter()
            .flatten()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter().flatten())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    input_tokens: u32,
    output_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{serve_once, serve_truncated};

    fn parse(json: &str) -> Result<ProviderResponse, ProviderError> {
        let api: ResponsesApiResponse = serde_json::from_str(json).unwrap();
        ResponsesProvider::into_response(api, "requested")
    }

    #[test]
    fn request_body_shape() {
        let body = ResponsesProvider::request_body(&ProviderRequest::new("o4-mini", "route this"));
        assert_eq!(body["model"], "o4-mini");
        assert_eq!(body["input"], "route this");
        assert_eq!(body["reasoning"]["effort"], "medium");
    }

    #[test]
    fn text_from_message_items_skips_reasoning() {
        let response = parse(
            r#"{
                "model": "o4-mini",
                "output": [
                    {"type": "reasoning", "summary": []},
                    {"type": "message", "role": "assistant", "content": [
                        {"type": "output_text", "text": "{\"docs\":[],"},
                        {"type": "output_text", "text": "\"skills\":[\"deploy\"]}"}
                    ]}
                ],
                "usage": {"input_tokens": 100, "output_tokens": 20, "total_tokens": 120}
            }"#,
        )
        .unwrap();
        assert_eq!(response.content, r#"{"docs":[],"skills":["deploy"]}"#);
        assert_eq!(response.model, "o4-mini");
        assert_eq!(response.usage.unwrap().prompt_tokens, 100);
    }

    #[test]
    fn top_level_output_text_wins() {
        let response = parse(r#"{"output_text": " {} ", "output": []}"#).unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.model, "requested");
    }

    #[test]
    fn no_text_is_empty_response() {
        assert!(matches!(
            parse(r#"{"output":[{"type":"reasoning"}]}"#),
            Err(ProviderError::EmptyResponse(_))
        ));
        assert!(matches!(parse(r#"{"output":null}"#), Err(ProviderError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn missing_key_is_auth_error() {
        let provider = ResponsesProvider::new("http://127.0.0.1:9/v1", None);
        let err = provider
            .complete(ProviderRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn complete_posts_to_responses_endpoint() {
        let (base_url, request) = serve_once(
            200,
            r#"{"output":[{"type":"message","content":[{"type":"output_text","text":"{\"docs\":[],\"skills\":[]}"}]}]}"#,
        )
        .await;

        let provider = ResponsesProvider::new(base_url, Some("sk-test".into()));
        let response = provider
            .complete(ProviderRequest::new("o4-mini", "p"))
            .await
            .unwrap();
        assert_eq!(response.content, r#"{"docs":[],"skills":[]}"#);

        let raw_request = request.await.unwrap();
        assert!(raw_request.starts_with("POST /v1/responses"));
    }

    #[tokio::test]
    async fn connection_dropped_mid_body_is_network_error() {
        let base_url = serve_truncated(r#"{"output":["#).await;

        let provider = ResponsesProvider::new(base_url, Some("sk-test".into()));
        let err = provider
            .complete(ProviderRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let (base_url, _request) = serve_once(503, "upstream unavailable").await;

        let provider = ResponsesProvider::new(base_url, Some("sk-test".into()));
        let err = provider
            .complete(ProviderRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::ApiError {
                status_code: 503,
                message: "upstream unavailable".into()
            }
        );
    }
}
