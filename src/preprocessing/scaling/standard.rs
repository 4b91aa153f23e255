//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation (ddof = 0). A column whose standard deviation is zero,
//! or negligible next to its mean, is scaled by 1 instead, so a constant
//! column becomes all zeros rather than NaN.
//!
//! # Example
//! ```
//! use tabprep::dataset::{Column, Table};
//! use tabprep::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//!
//! let data = Table::from_columns(vec![("age", Column::Numeric(vec![10.0, 20.0, 30.0]))]).unwrap();
//! let scaler = StandardScaler::new().with_mean(true).with_std(true);
//!
//! let fitted = scaler.fit(&data).unwrap();
//! let scaled = fitted.transform(&data).unwrap();
//! assert!((scaled.numeric_column("age").unwrap()[1]).abs() < 1e-12);
//!
//! // Later, for inference:
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("scaler.bin");
//! fitted.save_to_file(&path).unwrap();
//! let loaded = FittedStandardScaler::load_from_file(&path).unwrap();
//! assert_eq!(loaded.mean(), fitted.mean());
//! ```

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Column, ColumnKind, Table};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_fit_input, fitted_column, FittedTransformer, Transformer};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Columns seen during fit.
    pub feature_names: Vec<String>,
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Population standard deviation of each feature, as measured.
    pub std: Vec<f64>,
    /// Divisor actually applied: `std`, with negligible values replaced by 1.
    pub scale: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: StandardScalerConfig) -> Self {
        Self { config }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }
}

/// Replace a zero or negligible standard deviation by 1.
fn handle_zero_scale(std: f64, mean: f64) -> f64 {
    let negligible = 10.0 * f64::EPSILON * mean.abs();
    if std == 0.0 || std <= negligible || !std.is_finite() {
        1.0
    } else {
        std
    }
}

impl Transformer for StandardScaler {
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError> {
        check_fit_input("StandardScaler", data, ColumnKind::Numeric)?;

        let n = data.n_columns();
        let mut mean = Vec::with_capacity(n);
        let mut std = Vec::with_capacity(n);
        let mut scale = Vec::with_capacity(n);

        for (name, column) in data.iter() {
            let values = column.as_numeric().unwrap_or_default();
            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "non-finite value in column '{}' at row {}",
                    name, row
                )));
            }
            let view = ArrayView1::from(values);
            let m = view.mean().unwrap_or(0.0);
            let s = view.std(0.0);
            mean.push(m);
            std.push(s);
            scale.push(handle_zero_scale(s, m));
        }

        debug!(columns = n, rows = data.n_rows(), "fitted StandardScaler");

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            feature_names: data.column_names().to_vec(),
            mean,
            std,
            scale,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    feature_names: Vec<String>,
    mean: Vec<f64>,
    std: Vec<f64>,
    scale: Vec<f64>,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Get the population standard deviation of each feature.
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Get the divisor applied to each feature.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        let mut out = Table::empty(data.n_rows());
        for (j, name) in self.feature_names.iter().enumerate() {
            let column = fitted_column(data, name, ColumnKind::Numeric)?;
            let values = column.as_numeric().unwrap_or_default();
            let shift = if self.config.with_mean { self.mean[j] } else { 0.0 };
            let divisor = if self.config.with_std { self.scale[j] } else { 1.0 };
            let scaled = values.iter().map(|&x| (x - shift) / divisor).collect();
            out.push_column(name.clone(), Column::Numeric(scaled))?;
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            feature_names: self.feature_names.clone(),
            mean: self.mean.clone(),
            std: self.std.clone(),
            scale: self.scale.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let n = params.feature_names.len();
        if params.mean.len() != n || params.std.len() != n || params.scale.len() != n {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: n,
                got_features: params.mean.len(),
            });
        }
        if params.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(
                "StandardScaler scale must be finite and non-zero".to_string(),
            ));
        }
        Ok(Self {
            config: params.config,
            feature_names: params.feature_names,
            mean: params.mean,
            std: params.std,
            scale: params.scale,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.feature_names.clone()
    }
}
