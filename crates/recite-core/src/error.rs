//! Error types shared across the recite crates.
//!
//! `ProviderError` lives here rather than in `recite-providers` so the grading
//! judge can classify failures without string matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ProgressTable;

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

    /// The model stopped before producing any text.
    #[error("model returned no text (finish reason {reason})")]
    EmptyResponse { reason: String },
}

impl ProviderError {
    /// Returns `true` if retrying with the same configuration cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }
}

/// Errors from a progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("progress store unreachable: {0}")]
    Network(String),

    /// The store rejected the request.
    #[error("progress store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A table is missing or does not have the expected columns.
    #[error("table '{table}' is malformed: {message}")]
    Schema {
        table: ProgressTable,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("could not decode store response: {0}")]
    Decode(String),
}

/// Errors from loading a quiz bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("quiz bank file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read quiz bank {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from driving a quiz session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The pool is empty, so there is nothing to answer.
    #[error("no question is loaded; the pool is empty")]
    EmptyPool,

    /// Graduation is only offered for a completed question in normal mode.
    #[error("graduation is only available after a correct answer in normal mode")]
    GraduateUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_permanence() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("m".into()).is_permanent());
        assert!(!ProviderError::Timeout(60).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 5000 }.is_permanent());
    }

    #[test]
    fn bank_error_mentions_path() {
        let err = BankError::NotFound(PathBuf::from("quiz_data.txt"));
        assert!(err.to_string().contains("quiz_data.txt"));
    }
}
