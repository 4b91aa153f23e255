//! Ordinal encoding for categorical features.
//!
//! Maps each category of a column to an integer code in `0..n_categories`,
//! emitted as a numeric column of the same name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Column, ColumnKind, Table};
use crate::preprocessing::encoding::{CategoryOrder, HandleUnknown, Vocabulary};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_fit_input, fitted_column, FittedTransformer, Transformer};

/// Configuration for OrdinalEncoder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoderConfig {
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    #[serde(default)]
    pub category_order: CategoryOrder,
}

/// Ordinal encoder for categorical features.
///
/// # Example
/// ```
/// use tabprep::dataset::{Column, Table};
/// use tabprep::preprocessing::{FittedTransformer, OrdinalEncoder, Transformer};
///
/// let data = Table::from_columns(vec![("sex", Column::categorical(["Male", "Female"]))]).unwrap();
/// let encoded = OrdinalEncoder::new().fit_transform(&data).unwrap();
/// assert_eq!(encoded.numeric_column("sex").unwrap(), &[1.0, 0.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrdinalEncoder {
    config: OrdinalEncoderConfig,
}

impl OrdinalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: OrdinalEncoderConfig) -> Self {
        Self { config }
    }

    /// Set the strategy for handling unknown categories.
    ///
    /// Only [`HandleUnknown::Error`] and [`HandleUnknown::UseEncodedValue`]
    /// are meaningful here; `Ignore` is rejected at fit.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.config.handle_unknown = strategy;
        self
    }

    /// Encode unknown categories as `code` instead of failing.
    pub fn with_unknown_value(self, code: i64) -> Self {
        self.with_handle_unknown(HandleUnknown::UseEncodedValue(code))
    }

    pub fn with_category_order(mut self, order: CategoryOrder) -> Self {
        self.config.category_order = order;
        self
    }

    pub fn config(&self) -> &OrdinalEncoderConfig {
        &self.config
    }
}

/// Serializable parameters for a fitted OrdinalEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoderParams {
    pub feature_names: Vec<String>,
    pub vocabularies: Vec<Vocabulary>,
    pub handle_unknown: HandleUnknown,
}

impl Transformer for OrdinalEncoder {
    type Params = OrdinalEncoderParams;
    type Fitted = FittedOrdinalEncoder;

    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError> {
        check_fit_input("OrdinalEncoder", data, ColumnKind::Categorical)?;

        let vocabularies: Vec<Vocabulary> = data
            .iter()
            .map(|(_, column)| {
                Vocabulary::learn(
                    column.as_categorical().unwrap_or_default(),
                    self.config.category_order,
                )
            })
            .collect();

        validate_policy(self.config.handle_unknown, &vocabularies)?;
        debug!(
            columns = vocabularies.len(),
            categories = vocabularies.iter().map(Vocabulary::len).sum::<usize>(),
            "fitted OrdinalEncoder"
        );

        Ok(FittedOrdinalEncoder {
            feature_names: data.column_names().to_vec(),
            vocabularies,
            handle_unknown: self.config.handle_unknown,
        })
    }
}

fn validate_policy(policy: HandleUnknown, vocabularies: &[Vocabulary]) -> Result<(), PreprocessingError> {
    match policy {
        HandleUnknown::Error => Ok(()),
        HandleUnknown::Ignore => Err(PreprocessingError::InvalidParameter(
            "OrdinalEncoder does not support HandleUnknown::Ignore; use UseEncodedValue".to_string(),
        )),
        HandleUnknown::UseEncodedValue(code) => {
            let max_len = vocabularies.iter().map(Vocabulary::len).max().unwrap_or(0);
            if code >= 0 && (code as usize) < max_len {
                Err(PreprocessingError::InvalidParameter(format!(
                    "unknown value {} collides with a category code in 0..{}",
                    code, max_len
                )))
            } else {
                Ok(())
            }
        }
    }
}

/// Fitted OrdinalEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOrdinalEncoder {
    feature_names: Vec<String>,
    vocabularies: Vec<Vocabulary>,
    handle_unknown: HandleUnknown,
}

impl FittedOrdinalEncoder {
    /// Vocabulary learned for each input column, in fit order.
    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    fn encode(&self, name: &str, vocab: &Vocabulary, value: &str) -> Result<f64, PreprocessingError> {
        match (vocab.code(value), self.handle_unknown) {
            (Some(code), _) => Ok(code as f64),
            (None, HandleUnknown::UseEncodedValue(code)) => Ok(code as f64),
            (None, _) => Err(PreprocessingError::UnknownCategory {
                column: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl FittedTransformer for FittedOrdinalEncoder {
    type Params = OrdinalEncoderParams;

    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        let mut out = Table::empty(data.n_rows());
        for (name, vocab) in self.feature_names.iter().zip(&self.vocabularies) {
            let column = fitted_column(data, name, ColumnKind::Categorical)?;
            let codes = column
                .as_categorical()
                .unwrap_or_default()
                .iter()
                .map(|v| self.encode(name, vocab, v))
                .collect::<Result<Vec<f64>, _>>()?;
            out.push_column(name.clone(), Column::Numeric(codes))?;
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        OrdinalEncoderParams {
            feature_names: self.feature_names.clone(),
            vocabularies: self.vocabularies.clone(),
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.feature_names.len() != params.vocabularies.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.feature_names.len(),
                got_features: params.vocabularies.len(),
            });
        }
        validate_policy(params.handle_unknown, &params.vocabularies)?;
        Ok(Self {
            feature_names: params.feature_names,
            vocabularies: params.vocabularies,
            handle_unknown: params.handle_unknown,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.feature_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str, values: &[&str]) -> Table {
        Table::from_columns(vec![(name, Column::categorical(values.iter().copied()))]).unwrap()
    }

    #[test]
    fn test_ordinal_two_categories() {
        let data = single("c", &["a", "b"]);
        let out = OrdinalEncoder::new().fit_transform(&data).unwrap();
        assert_eq!(out.numeric_column("c").unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn test_codes_are_sorted_not_first_seen() {
        let data = single("sex", &["Male", "Female", "Male"]);
        let out = OrdinalEncoder::new().fit_transform(&data).unwrap();
        assert_eq!(out.numeric_column("sex").unwrap(), &[1.0, 0.0, 1.0]);

        let first_seen = OrdinalEncoder::new()
            .with_category_order(CategoryOrder::FirstSeen)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(first_seen.numeric_column("sex").unwrap(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_codes_in_range() {
        let data = single("education", &["HS-grad", "Bachelors", "Masters", "HS-grad", "11th"]);
        let fitted = OrdinalEncoder::new().fit(&data).unwrap();
        let n = fitted.vocabularies()[0].len() as f64;
        for &code in fitted.transform(&data).unwrap().numeric_column("education").unwrap() {
            assert!(code >= 0.0 && code < n);
            assert_eq!(code.fract(), 0.0);
        }
    }

    #[test]
    fn test_unknown_category_errors() {
        let fitted = OrdinalEncoder::new().fit(&single("c", &["a", "b"])).unwrap();
        let err = fitted.transform(&single("c", &["z"])).unwrap_err();
        assert_eq!(
            err,
            PreprocessingError::UnknownCategory {
                column: "c".to_string(),
                value: "z".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_category_sentinel() {
        let fitted = OrdinalEncoder::new()
            .with_unknown_value(-1)
            .fit(&single("c", &["a", "b"]))
            .unwrap();
        let out = fitted.transform(&single("c", &["b", "z"])).unwrap();
        assert_eq!(out.numeric_column("c").unwrap(), &[1.0, -1.0]);
    }

    #[test]
    fn test_sentinel_collision_rejected() {
        let err = OrdinalEncoder::new()
            .with_unknown_value(1)
            .fit(&single("c", &["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, PreprocessingError::InvalidParameter(_)));
    }

    #[test]
    fn test_ignore_rejected() {
        let err = OrdinalEncoder::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&single("c", &["a"]))
            .unwrap_err();
        assert!(matches!(err, PreprocessingError::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_numeric_column() {
        let data = Table::from_columns(vec![("age", Column::Numeric(vec![1.0]))]).unwrap();
        assert!(matches!(
            OrdinalEncoder::new().fit(&data),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_params_roundtrip() {
        let fitted = OrdinalEncoder::new().fit(&single("c", &["x", "y", "x"])).unwrap();
        let restored = FittedOrdinalEncoder::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.extract_params(), fitted.extract_params());
        assert_eq!(restored.n_features_out(), 1);
    }
}
