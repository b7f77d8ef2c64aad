//! API error types.

use ion_sso::SsoError;
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the API session.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(#[from] SsoError),

    #[error("api transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {path} failed with status {status}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    #[error("invalid response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    pub(crate) fn decode(path: &str, message: impl Into<String>) -> Self {
        ApiError::Decode {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
