//! Model error types

use dataset_spi::DatasetError;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting, forecasting or predicting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The submitted dataset failed validation
    #[error(transparent)]
    Validation(#[from] DatasetError),

    /// Too few distinct feature values for the regression degree
    #[error("Insufficient data: need at least {required} distinct time-of-day values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Too few observations for the seasonal order
    #[error("Insufficient history: need at least {required} points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// The seasonal optimizer did not reach tolerance
    #[error("Seasonal model failed to converge after {iterations} iterations")]
    NonConvergent { iterations: usize },

    /// A fit ran past the configured deadline
    #[error("Model fit exceeded the {seconds}s timeout")]
    FitTimeout { seconds: u64 },

    /// Prediction requested before the required models were fitted
    #[error("{0}")]
    ModelNotLoaded(String),

    /// Unknown prediction `type`
    #[error("Invalid prediction type: {0}")]
    InvalidPredictionType(String),

    /// Series sampled at an interval the seasonal period does not describe
    #[error("Incompatible sampling interval: expected {expected_minutes} minutes, observed {observed_minutes} minutes")]
    IncompatibleSamplingInterval {
        expected_minutes: i64,
        observed_minutes: i64,
    },

    /// Invalid model parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Model used before fitting
    #[error("Model must be fitted before prediction")]
    NotFitted,

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Invalid input series
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ModelError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ModelError::Validation(_)
                | ModelError::InsufficientData { .. }
                | ModelError::InsufficientHistory { .. }
                | ModelError::InvalidPredictionType(_)
                | ModelError::IncompatibleSamplingInterval { .. }
                | ModelError::InvalidData(_)
        )
    }
}
