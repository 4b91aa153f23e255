//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and can learn from data.
//! - [`FittedTransformer`]: After fitting; ready for inference and serialization.
//!
//! Both operate on [`Table`]s and look columns up by name, so a fitted
//! transformer can be applied to any table that still carries the columns it
//! was fitted on, whatever their position.

use std::collections::HashSet;

use crate::dataset::{Column, ColumnKind, Table};
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Example
/// ```
/// use tabprep::dataset::{Column, Table};
/// use tabprep::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let data = Table::from_columns(vec![("age", Column::Numeric(vec![10.0, 20.0, 30.0]))]).unwrap();
/// let fitted = StandardScaler::new().fit(&data).unwrap();
/// let scaled = fitted.transform(&data).unwrap();
/// assert_eq!(scaled.n_rows(), 3);
/// ```
pub trait Transformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Fit the transformer to every column of `data`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - Data has no rows
    /// - A column has the wrong kind for this transformer
    /// - A hyperparameter is inconsistent with the data
    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` never changes the row count or row order.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform the fitted columns of `data` using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - A fitted column is absent from `data`
    /// - A column's kind differs from the one seen during fit
    /// - A value is outside what was learned and the policy forbids it
    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Names of the columns seen during fit, in fit order.
    fn feature_names_in(&self) -> &[String];

    /// Names of the columns produced by `transform`, in output order.
    fn feature_names_out(&self) -> Vec<String>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize {
        self.feature_names_in().len()
    }

    /// Returns the number of features produced by `transform`.
    fn n_features_out(&self) -> usize {
        self.feature_names_out().len()
    }

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let params = self.extract_params();
        let bytes = params
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

/// Fetch `name` from `data` for a fitted transformer, checking its kind.
pub(crate) fn fitted_column<'a>(
    data: &'a Table,
    name: &str,
    expected: ColumnKind,
) -> Result<&'a Column, PreprocessingError> {
    let column = data.column(name)?;
    if column.kind() != expected {
        return Err(PreprocessingError::TypeMismatch {
            column: name.to_string(),
            expected,
            got: column.kind(),
        });
    }
    Ok(column)
}

/// Reject generated output names that repeat, returning the first repeat.
pub(crate) fn check_unique_names<'a, I>(names: I) -> Result<(), PreprocessingError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(PreprocessingError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

/// Reject empty input and columns whose kind differs from `expected`.
pub(crate) fn check_fit_input(
    transformer: &str,
    data: &Table,
    expected: ColumnKind,
) -> Result<(), PreprocessingError> {
    if data.is_empty() {
        return Err(PreprocessingError::EmptyData(format!(
            "Cannot fit {} on empty data",
            transformer
        )));
    }
    for spec in data.schema() {
        if spec.kind != expected {
            return Err(PreprocessingError::TypeMismatch {
                column: spec.name,
                expected,
                got: spec.kind,
            });
        }
    }
    Ok(())
}
