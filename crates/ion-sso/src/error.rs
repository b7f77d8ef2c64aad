//! Error types for the SSO client.

use thiserror::Error;

/// Result type alias for SSO operations.
pub type SsoResult<T> = Result<T, SsoError>;

/// Errors that can occur while logging in or refreshing tokens.
#[derive(Debug, Error)]
pub enum SsoError {
    #[error("sso transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sso request to {url} failed with status {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("authorization response carried no redirect location")]
    MissingRedirect,

    #[error("authorization redirect carried no code: {0}")]
    MissingCode(String),

    #[error("invalid sso response: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SsoError {
    /// Whether the upstream answered with a non-success HTTP status.
    ///
    /// Only status failures trigger the credential fallback; transport
    /// errors are surfaced as-is.
    pub fn is_status(&self) -> bool {
        matches!(self, SsoError::Status { .. })
    }

    /// The HTTP status, if this is a status failure.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            SsoError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
