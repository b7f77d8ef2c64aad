//! Metrics error types.

use ion_api::ApiError;
use thiserror::Error;

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("label names for {name} changed from {expected:?} to {found:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<&'static str>,
        found: Vec<&'static str>,
    },
}
