//! Identity scaler: numeric columns pass through unchanged.
//!
//! Useful as an explicit binding in a [`ColumnTransformer`](crate::preprocessing::ColumnTransformer)
//! when some numeric columns should reach the model as-is.

use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnKind, Table};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_fit_input, fitted_column, FittedTransformer, Transformer};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityScalerParams {
    pub feature_names: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct IdentityScaler;

impl IdentityScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IdentityScaler {
    type Params = IdentityScalerParams;
    type Fitted = FittedIdentityScaler;

    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError> {
        check_fit_input("IdentityScaler", data, ColumnKind::Numeric)?;
        Ok(FittedIdentityScaler {
            feature_names: data.column_names().to_vec(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct FittedIdentityScaler {
    feature_names: Vec<String>,
}

impl FittedTransformer for FittedIdentityScaler {
    type Params = IdentityScalerParams;

    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        for name in &self.feature_names {
            fitted_column(data, name, ColumnKind::Numeric)?;
        }
        data.select(&self.feature_names)
    }

    fn extract_params(&self) -> Self::Params {
        IdentityScalerParams {
            feature_names: self.feature_names.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            feature_names: params.feature_names,
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
    use crate::dataset::Column;

    #[test]
    fn test_identity_passes_values_through() {
        let data = Table::from_columns(vec![
            ("capital-gain", Column::Numeric(vec![0.0, 2174.0, 99999.0])),
            ("capital-loss", Column::Numeric(vec![0.0, 0.0, 1902.0])),
        ])
        .unwrap();
        let out = IdentityScaler::new().fit_transform(&data).unwrap();
        assert_eq!(out.column_names(), data.column_names());
        assert_eq!(
            out.numeric_column("capital-gain").unwrap(),
            &[0.0, 2174.0, 99999.0]
        );
    }

    #[test]
    fn test_identity_rejects_categorical() {
        let data = Table::from_columns(vec![("race", Column::categorical(["White"]))]).unwrap();
        assert!(matches!(
            IdentityScaler::new().fit(&data),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_identity_transform_type_change() {
        let train = Table::from_columns(vec![("x", Column::Numeric(vec![1.0]))]).unwrap();
        let fitted = IdentityScaler::new().fit(&train).unwrap();
        let test = Table::from_columns(vec![("x", Column::categorical(["1"]))]).unwrap();
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }
}
