//! Error types for tables, selectors and preprocessing operations.

use crate::dataset::ColumnKind;
use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessingError {
    /// A selector or transformer referenced a column the table does not have.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),
    /// A fitted binding's column is absent from the table being transformed.
    #[error("Missing column '{column}' required by binding '{binding}'")]
    MissingColumn { binding: String, column: String },
    /// Two columns share a name where names must be unique.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),
    /// A column's length disagrees with the table's row count.
    #[error("Length mismatch in column '{column}': expected {expected} rows, got {got}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
    /// A transformer was bound to a column of the wrong kind.
    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
        got: ColumnKind,
    },
    /// A category was not seen during fit and the policy forbids it.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },
    /// The same column is claimed by two bindings.
    #[error("Column '{column}' is bound by both '{first}' and '{second}'")]
    OverlappingColumns {
        column: String,
        first: String,
        second: String,
    },
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Invalid hyperparameter value or invalid input value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A raw value could not be parsed into its declared kind.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for PreprocessingError {
    fn from(err: csv::Error) -> Self {
        PreprocessingError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_column() {
        let err = PreprocessingError::MissingColumn {
            binding: "one-hot-encoder".to_string(),
            column: "race".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("race"));
        assert!(msg.contains("one-hot-encoder"));
    }

    #[test]
    fn test_error_display_type_mismatch() {
        let err = PreprocessingError::TypeMismatch {
            column: "age".to_string(),
            expected: ColumnKind::Categorical,
            got: ColumnKind::Numeric,
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch in column 'age': expected categorical, got numeric"
        );
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PreprocessingError::UnknownCategory {
            column: "native-country".to_string(),
            value: "Holand-Netherlands".to_string(),
        };
        assert!(err.to_string().contains("Holand-Netherlands"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
