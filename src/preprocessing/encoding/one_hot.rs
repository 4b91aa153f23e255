//! One-hot encoding for categorical features.
//!
//! Each categorical column with `k` learned categories becomes `k` numeric
//! indicator columns named `"{column}_{category}"`, in vocabulary order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Column, ColumnKind, Table};
use crate::preprocessing::encoding::{CategoryOrder, HandleUnknown, Vocabulary};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{
    check_fit_input, check_unique_names, fitted_column, FittedTransformer, Transformer,
};

/// Configuration for OneHotEncoder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderConfig {
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    #[serde(default)]
    pub category_order: CategoryOrder,
}

/// One-hot encoder for categorical features.
///
/// Learns the distinct values of each column during fitting and expands every
/// column into one indicator per value.
///
/// # Example
/// ```
/// use tabprep::dataset::{Column, Table};
/// use tabprep::preprocessing::{HandleUnknown, OneHotEncoder, Transformer};
///
/// let data = Table::from_columns(vec![("c", Column::categorical(["a", "b"]))]).unwrap();
/// let encoded = OneHotEncoder::new()
///     .with_handle_unknown(HandleUnknown::Ignore)
///     .fit_transform(&data)
///     .unwrap();
///
/// assert_eq!(encoded.column_names(), &["c_a", "c_b"]);
/// assert_eq!(encoded.numeric_column("c_a").unwrap(), &[1.0, 0.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    config: OneHotEncoderConfig,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: OneHotEncoderConfig) -> Self {
        Self { config }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.config.handle_unknown = strategy;
        self
    }

    pub fn with_category_order(mut self, order: CategoryOrder) -> Self {
        self.config.category_order = order;
        self
    }

    pub fn config(&self) -> &OneHotEncoderConfig {
        &self.config
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Input columns seen during fit.
    pub feature_names: Vec<String>,
    /// Categories for each input column.
    pub vocabularies: Vec<Vocabulary>,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

impl Transformer for OneHotEncoder {
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if let HandleUnknown::UseEncodedValue(_) = self.config.handle_unknown {
            return Err(PreprocessingError::InvalidParameter(
                "OneHotEncoder supports HandleUnknown::Error or HandleUnknown::Ignore".to_string(),
            ));
        }
        check_fit_input("OneHotEncoder", data, ColumnKind::Categorical)?;

        let vocabularies: Vec<Vocabulary> = data
            .iter()
            .map(|(_, column)| {
                Vocabulary::learn(
                    column.as_categorical().unwrap_or_default(),
                    self.config.category_order,
                )
            })
            .collect();

        let fitted = FittedOneHotEncoder {
            feature_names: data.column_names().to_vec(),
            vocabularies,
            handle_unknown: self.config.handle_unknown,
        };
        // `col_cat` names are joined with '_', so ("a", "b_c") and ("a_b", "c") collide.
        check_unique_names(&fitted.feature_names_out())?;
        debug!(
            columns = fitted.feature_names.len(),
            features_out = fitted.n_features_out(),
            "fitted OneHotEncoder"
        );
        Ok(fitted)
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    feature_names: Vec<String>,
    vocabularies: Vec<Vocabulary>,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each feature.
    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        let n_rows = data.n_rows();
        let mut out = Table::empty(n_rows);

        for (name, vocab) in self.feature_names.iter().zip(&self.vocabularies) {
            let column = fitted_column(data, name, ColumnKind::Categorical)?;
            let values = column.as_categorical().unwrap_or_default();

            let mut indicators = vec![vec![0.0; n_rows]; vocab.len()];
            for (row, value) in values.iter().enumerate() {
                match vocab.code(value) {
                    Some(code) => indicators[code][row] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Ignore => {}
                    None => {
                        return Err(PreprocessingError::UnknownCategory {
                            column: name.clone(),
                            value: value.clone(),
                        })
                    }
                }
            }

            for (category, indicator) in vocab.categories().iter().zip(indicators) {
                out.push_column(format!("{}_{}", name, category), Column::Numeric(indicator))?;
            }
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
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
        let fitted = Self {
            feature_names: params.feature_names,
            vocabularies: params.vocabularies,
            handle_unknown: params.handle_unknown,
        };
        check_unique_names(&fitted.feature_names_out())?;
        Ok(fitted)
    }

    fn feature_names_in(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.feature_names
            .iter()
            .zip(&self.vocabularies)
            .flat_map(|(name, vocab)| {
                vocab
                    .categories()
                    .iter()
                    .map(move |category| format!("{}_{}", name, category))
            })
            .collect()
    }

    fn n_features_out(&self) -> usize {
        self.vocabularies.iter().map(Vocabulary::len).sum()
    }
}
