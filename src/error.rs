//! Top-level error for estimators, splitting and cross-validation.

use thiserror::Error;

use crate::model::ModelError;
use crate::preprocessing::PreprocessingError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// `transform`, `predict` or `score` called before `fit`.
    #[error("Pipeline is not fitted; call fit before {0}")]
    NotFitted(&'static str),
    #[error("Target has {got} values but the table has {expected} rows")]
    TargetLength { expected: usize, got: usize },
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_display() {
        let err: PipelineError = PreprocessingError::ColumnNotFound("age".to_string()).into();
        assert_eq!(err.to_string(), "Column not found: 'age'");
    }

    #[test]
    fn test_not_fitted_display() {
        let err = PipelineError::NotFitted("predict");
        assert!(err.to_string().contains("predict"));
    }
}
