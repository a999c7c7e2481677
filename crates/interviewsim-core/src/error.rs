//! Provider and scoring error types.
//!
//! `ProviderError` is defined here rather than in `interviewsim-providers` so
//! the scoring engine can downcast provider failures and name the reason in
//! its fallback feedback without string matching.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Failures at the remote scoring boundary. Each one becomes a fallback
/// evaluation; none of them reach the session driver.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// No provider is available (usually a missing API key).
    #[error("remote scoring not configured: {0}")]
    Unconfigured(String),

    /// The provider call itself failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Any other transport failure reported by the provider.
    #[error("provider failure: {0}")]
    Transport(String),

    /// The response text was not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response was valid JSON but not an object.
    #[error("response is not a JSON object (got {0})")]
    NotAnObject(&'static str),

    /// A required field was missing or had the wrong type.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ScoringError {
    /// Classify an `anyhow` error returned by a provider.
    pub fn from_provider(err: anyhow::Error) -> Self {
        match err.downcast::<ProviderError>() {
            Ok(provider) => ScoringError::Provider(provider),
            Err(other) => ScoringError::Transport(format!("{other:#}")),
        }
    }
}
