use thiserror::Error;

/// Errors raised while training or applying a classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    #[error("Empty data: {0}")]
    EmptyData(String),
    #[error("Invalid label {0}: binary classifiers expect 0 or 1")]
    InvalidLabel(f64),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<bincode::Error> for ModelError {
    fn from(err: bincode::Error) -> Self {
        ModelError::SerializationError(err.to_string())
    }
}
