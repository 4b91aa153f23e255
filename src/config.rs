//! JSON description of a whole experiment.
//!
//! A [`WorkflowConfig`] names the dataset, the preprocessor bindings, the
//! classifier and the cross-validation scheme, and builds the matching
//! library objects.

use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{ColumnSelector, Table};
use crate::error::PipelineError;
use crate::model::{LogisticRegression, LogisticRegressionConfig};
use crate::model_selection::{CrossValidator, CvStrategy};
use crate::pipeline::Pipeline;
use crate::preprocessing::{
    ColumnTransformer, ColumnTransformerStep, HandleUnknown, IdentityScaler, LabelEncoder,
    OneHotEncoder, OneHotEncoderConfig, OrdinalEncoder, OrdinalEncoderConfig, PreprocessingError,
    Remainder, StandardScaler, StandardScalerConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where the data lives and which column is the target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub target: String,
    /// Columns removed before preprocessing, besides the target.
    #[serde(default)]
    pub drop_columns: Vec<String>,
    /// Label mapped to 1; others map to 0. Without it labels are encoded in sorted order.
    #[serde(default)]
    pub positive_label: Option<String>,
}

/// Transformer settings, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformerConfig {
    Identity,
    StandardScaler(StandardScalerConfig),
    OrdinalEncoder(OrdinalEncoderConfig),
    OneHotEncoder(OneHotEncoderConfig),
}

impl TransformerConfig {
    pub fn build(&self) -> ColumnTransformerStep {
        match self {
            TransformerConfig::Identity => IdentityScaler::new().into(),
            TransformerConfig::StandardScaler(c) => StandardScaler::from_config(c.clone()).into(),
            TransformerConfig::OrdinalEncoder(c) => OrdinalEncoder::from_config(c.clone()).into(),
            TransformerConfig::OneHotEncoder(c) => OneHotEncoder::from_config(c.clone()).into(),
        }
    }
}

/// One named `(transformer, columns)` triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    pub transformer: TransformerConfig,
    pub columns: ColumnSelector,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    pub n_splits: usize,
    pub shuffle: bool,
    pub stratified: bool,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            n_splits: 5,
            shuffle: false,
            stratified: false,
            seed: 0,
            parallel: true,
        }
    }
}

fn default_test_size() -> f64 {
    0.25
}

fn default_seed() -> u64 {
    42
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub data: DataConfig,
    pub bindings: Vec<BindingConfig>,
    #[serde(default)]
    pub remainder: Remainder,
    #[serde(default)]
    pub classifier: LogisticRegressionConfig,
    #[serde(default)]
    pub cross_validation: CrossValidationConfig,
    /// Held-out share for the train/test runs.
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl WorkflowConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.target.is_empty() {
            return Err(ConfigError::Invalid("data.target must not be empty".to_string()));
        }
        if self.bindings.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one binding is required".to_string(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.cross_validation.n_splits < 2 {
            return Err(ConfigError::Invalid(format!(
                "cross_validation.n_splits must be at least 2, got {}",
                self.cross_validation.n_splits
            )));
        }
        Ok(())
    }

    pub fn build_preprocessor(&self) -> ColumnTransformer {
        self.bindings
            .iter()
            .fold(ColumnTransformer::new(), |ct, b| {
                ct.add(b.name.clone(), b.transformer.build(), b.columns.clone())
            })
            .with_remainder(self.remainder)
    }

    pub fn build_classifier(&self) -> LogisticRegression {
        LogisticRegression::from_config(self.classifier.clone())
    }

    pub fn build_pipeline(&self) -> Pipeline<LogisticRegression> {
        Pipeline::new(self.build_preprocessor(), self.build_classifier())
    }

    pub fn build_cross_validator(&self) -> CrossValidator {
        let cv = &self.cross_validation;
        let strategy = if cv.stratified {
            CvStrategy::StratifiedKFold {
                n_splits: cv.n_splits,
                shuffle: cv.shuffle,
            }
        } else {
            CvStrategy::KFold {
                n_splits: cv.n_splits,
                shuffle: cv.shuffle,
            }
        };
        CrossValidator::new(strategy)
            .with_seed(cv.seed)
            .with_parallel(cv.parallel)
    }

    /// Split `raw` into feature table and encoded target, dropping the
    /// configured columns.
    pub fn prepare(&self, raw: &Table) -> Result<(Table, Array1<f64>), PipelineError> {
        let labels = raw.categorical_column(&self.data.target)?;
        let y = match &self.data.positive_label {
            Some(positive) => labels
                .iter()
                .map(|l| if l == positive { 1.0 } else { 0.0 })
                .collect(),
            None => {
                let (encoder, y) = LabelEncoder::new().fit_transform(labels)?;
                if encoder.n_classes() != 2 {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "target '{}' has {} classes, expected 2",
                        self.data.target,
                        encoder.n_classes()
                    ))
                    .into());
                }
                y
            }
        };

        let mut dropped = vec![self.data.target.clone()];
        dropped.extend(
            self.data
                .drop_columns
                .iter()
                .filter(|c| raw.contains(c))
                .cloned(),
        );
        let data = raw.drop_columns(&dropped)?;
        Ok((data, y))
    }

    /// Adult census experiment: `sex` ordinal-encoded, the other categorical
    /// columns one-hot encoded, numeric columns standardized.
    pub fn adult_census() -> Self {
        Self {
            data: DataConfig {
                path: Some(PathBuf::from("datasets/adult-census.csv")),
                target: "class".to_string(),
                drop_columns: vec!["fnlwgt".to_string()],
                positive_label: None,
            },
            bindings: vec![
                BindingConfig {
                    name: "binary-encoder".to_string(),
                    transformer: TransformerConfig::OrdinalEncoder(OrdinalEncoderConfig::default()),
                    columns: ColumnSelector::names(["sex"]),
                },
                BindingConfig {
                    name: "one-hot-encoder".to_string(),
                    transformer: TransformerConfig::OneHotEncoder(OneHotEncoderConfig {
                        handle_unknown: HandleUnknown::Ignore,
                        ..Default::default()
                    }),
                    columns: ColumnSelector::names([
                        "workclass",
                        "education",
                        "marital-status",
                        "occupation",
                        "relationship",
                        "race",
                        "native-country",
                    ]),
                },
                BindingConfig {
                    name: "standard-scaler".to_string(),
                    transformer: TransformerConfig::StandardScaler(StandardScalerConfig::default()),
                    columns: ColumnSelector::names([
                        "age",
                        "education-num",
                        "hours-per-week",
                        "capital-gain",
                        "capital-loss",
                    ]),
                },
            ],
            remainder: Remainder::Drop,
            classifier: LogisticRegressionConfig {
                max_iter: 1000,
                ..Default::default()
            },
            // Classifier scoring uses class-balanced folds in file order.
            cross_validation: CrossValidationConfig {
                stratified: true,
                ..Default::default()
            },
            test_size: default_test_size(),
            seed: default_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    const MINIMAL: &str = r#"{
        "data": { "target": "class" },
        "bindings": [
            { "name": "num", "transformer": { "type": "standard_scaler" }, "columns": { "kind": "numeric" } },
            {
                "name": "cat",
                "transformer": { "type": "one_hot_encoder", "handle_unknown": "ignore" },
                "columns": { "names": ["workclass"] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = WorkflowConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.bindings.len(), 2);
        assert_eq!(config.remainder, Remainder::Drop);
        assert_eq!(config.classifier, LogisticRegressionConfig::default());
        assert_eq!(config.cross_validation.n_splits, 5);
        assert_eq!(
            config.bindings[1].transformer,
            TransformerConfig::OneHotEncoder(OneHotEncoderConfig {
                handle_unknown: HandleUnknown::Ignore,
                ..Default::default()
            })
        );
        assert_eq!(config.build_preprocessor().binding_names(), vec!["num", "cat"]);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let no_bindings = r#"{ "data": { "target": "class" }, "bindings": [] }"#;
        assert!(matches!(
            WorkflowConfig::from_json_str(no_bindings),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorkflowConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_adult_census_round_trip() {
        let config = WorkflowConfig::adult_census();
        let json = config.to_json_string().unwrap();
        let parsed = WorkflowConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(
            parsed.build_preprocessor().binding_names(),
            vec!["binary-encoder", "one-hot-encoder", "standard-scaler"]
        );
        assert_eq!(parsed.build_classifier().config().max_iter, 1000);
    }

    #[test]
    fn test_build_cross_validator() {
        let mut config = WorkflowConfig::adult_census();
        config.cross_validation.parallel = false;
        let cv = config.build_cross_validator();
        assert_eq!(
            cv.strategy(),
            CvStrategy::StratifiedKFold {
                n_splits: 5,
                shuffle: false
            }
        );
        assert!(!cv.is_parallel());
    }

    #[test]
    fn test_census_folds_keep_class_balance_on_sorted_labels() {
        let y = Array1::from_iter((0..100).map(|i| if i < 70 { 0.0 } else { 1.0 }));
        let splits = WorkflowConfig::adult_census()
            .build_cross_validator()
            .split(100, Some(&y))
            .unwrap();
        assert_eq!(splits.len(), 5);
        for split in &splits {
            assert_eq!(split.test_indices.len(), 20);
            let positives = split.test_indices.iter().filter(|&&i| y[i] == 1.0).count();
            assert_eq!(positives, 6);
        }
    }

    #[test]
    fn test_prepare_encodes_target_and_drops_columns() {
        let raw = Table::from_columns(vec![
            ("age", Column::Numeric(vec![25.0, 38.0, 28.0])),
            ("fnlwgt", Column::Numeric(vec![1.0, 2.0, 3.0])),
            ("class", Column::categorical(["<=50K", ">50K", "<=50K"])),
        ])
        .unwrap();
        let (data, y) = WorkflowConfig::adult_census().prepare(&raw).unwrap();
        assert_eq!(data.column_names(), &["age"]);
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_prepare_positive_label() {
        let raw = Table::from_columns(vec![
            ("x", Column::Numeric(vec![1.0, 2.0, 3.0])),
            ("class", Column::categorical(["no", "yes", "maybe"])),
        ])
        .unwrap();
        let mut config = WorkflowConfig::adult_census();
        config.data.positive_label = Some("yes".to_string());
        let (_, y) = config.prepare(&raw).unwrap();
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 0.0]);

        config.data.positive_label = None;
        assert!(config.prepare(&raw).is_err());
    }
}
