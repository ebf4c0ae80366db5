//! Dataset error types

use thiserror::Error;

/// Result type alias for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors that can occur while decoding or validating a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// The dataset has no `timestamp` column
    #[error("CSV/JSON must contain timestamp column")]
    MissingTimestampColumn,

    /// Neither `{cpu, memory}` nor `{requests}` columns are present
    #[error("Required columns not found")]
    NoRecognizedMetrics,

    /// No timestamp was supplied at all
    #[error("No timestamp provided")]
    MissingTimestamp,

    /// A timestamp could not be parsed into a calendar datetime
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// A metric cell is not numeric
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Upload extension has no decoder
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Payload could not be decoded into a table
    #[error("Failed to decode dataset: {0}")]
    Decode(String),

    /// Columns of different lengths were combined into one table
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The dataset has a header but no rows
    #[error("Dataset contains no rows")]
    Empty,
}
