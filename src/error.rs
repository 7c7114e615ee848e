//! Error types for the amu-pca pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, AmuError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum AmuError {
    /// The decomposition matrix is empty, non-finite, or the backend failed
    #[error("Decomposition error: {0}")]
    DecompositionError(String),

    /// A record lacks a field that a later stage depends on
    #[error("Missing field: record '{record}' has no {field}")]
    MissingField { record: String, field: &'static str },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A backend returned factors that do not match the input matrix
    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },
}

impl From<serde_json::Error> for AmuError {
    fn from(err: serde_json::Error) -> Self {
        AmuError::SerializationError(err.to_string())
    }
}
