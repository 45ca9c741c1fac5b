//! Error types for the tabtrain harness

use thiserror::Error;

/// Result type alias for tabtrain operations
pub type Result<T> = std::result::Result<T, TabError>;

/// Main error type for the training harness.
///
/// Every variant is fatal to a run: nothing is caught and recovered
/// internally, and there are no retries.
#[derive(Error, Debug)]
pub enum TabError {
    /// A configured classname does not exist in the registry
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// A registered factory rejected its constructor parameters
    #[error("Construction error: {0}")]
    Construction(String),

    /// A required configuration field is missing or malformed
    #[error("Configuration error: {0}")]
    ConfigValidation(String),

    /// Missing column, degenerate target, or otherwise unusable data
    #[error("Data error: {0}")]
    Data(String),

    /// A scorer or an underlying fit/predict computation failed
    #[error("Compute error: {0}")]
    Compute(String),

    /// Writing or reading a run artifact failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A fitted-only operation was called on an unfitted estimator
    #[error("Pipeline not fitted")]
    NotFitted,
}

impl From<polars::error::PolarsError> for TabError {
    fn from(err: polars::error::PolarsError) -> Self {
        TabError::Data(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TabError {
    fn from(err: ndarray::ShapeError) -> Self {
        TabError::Compute(err.to_string())
    }
}
