//! Shared HTTP plumbing for the completion providers.

use std::time::Duration;

use ctxroute_core::error::ProviderError;
use tracing::warn;

/// Build the HTTP client, applying the optional transport deadline.
pub(crate) fn build_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to configure HTTP client, using defaults");
        reqwest::Client::new()
    })
}

/// The credential, or `AuthenticationFailed` before any network I/O.
pub(crate) fn require_api_key(api_key: &Option<String>) -> Result<&str, ProviderError> {
    api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::AuthenticationFailed(
                "no API key configured. Run: ctxroute config set api-key <your-key>".into(),
            )
        })
}

/// POST `body` as JSON and return the response if the status is 2xx.
pub(crate) async fn post_json(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &serde_json::Value,
) -> Result<reqwest::Response, ProviderError> {
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {api_key}"))
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %error_body, "Provider returned error");
    Err(ProviderError::ApiError {
        status_code: status.as_u16(),
        message: error_message(&error_body),
    })
}

/// Classify a failure to read a 2xx body: undecodable JSON is the
/// endpoint's fault, anything else is transport.
pub(crate) fn body_error(e: reqwest::Error) -> ProviderError {
    if e.is_decode() {
        ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        }
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; anything else is returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    value["error"]["message"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .or_else(|| value["message"].as_str())
        .map(String::from)
        .unwrap_or_else(|| body.trim().to_string())
}
