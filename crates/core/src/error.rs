//! Error types for the ctxroute domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type.

use thiserror::Error;

/// Failures of the completion endpoint call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No usable credential could be resolved
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The request could not be completed (DNS, connect, TLS, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with an error
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The endpoint succeeded but returned nothing usable
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Failures of the routing call path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("LLM error: {0}")]
    Provider(#[from] ProviderError),

    /// The model's answer was not the expected JSON shape
    #[error("failed to parse LLM response: {reason}")]
    Parse { reason: String, raw: String },
}

impl RouteError {
    /// The raw model text, when the failure happened after it was received.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            RouteError::Parse { raw, .. } => Some(raw),
            RouteError::Provider(_) => None,
        }
    }
}
