//! Label encoding for classification targets.
//!
//! Maps string class labels to `0..n_classes` in sorted order, so a binary
//! target like `["<=50K", ">50K"]` becomes `[0.0, 1.0]`.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::preprocessing::encoding::{CategoryOrder, Vocabulary};
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

const TARGET: &str = "<target>";

/// Label encoder (unfitted).
#[derive(Clone, Debug, Default)]
pub struct LabelEncoder;

impl LabelEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Learn the sorted set of classes in `labels`.
    pub fn fit<S: AsRef<str>>(&self, labels: &[S]) -> Result<FittedLabelEncoder, PreprocessingError> {
        if labels.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit LabelEncoder on empty labels".to_string(),
            ));
        }
        let owned: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        Ok(FittedLabelEncoder {
            classes: Vocabulary::learn(&owned, CategoryOrder::Sorted),
        })
    }

    pub fn fit_transform<S: AsRef<str>>(
        &self,
        labels: &[S],
    ) -> Result<(FittedLabelEncoder, Array1<f64>), PreprocessingError> {
        let fitted = self.fit(labels)?;
        let encoded = fitted.transform(labels)?;
        Ok((fitted, encoded))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    pub classes: Vocabulary,
}

/// Fitted label encoder.
#[derive(Clone, Debug)]
pub struct FittedLabelEncoder {
    classes: Vocabulary,
}

impl FittedLabelEncoder {
    pub fn classes(&self) -> &[String] {
        self.classes.categories()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code of a single class label.
    pub fn encode(&self, label: &str) -> Result<f64, PreprocessingError> {
        self.classes
            .code(label)
            .map(|c| c as f64)
            .ok_or_else(|| PreprocessingError::UnknownCategory {
                column: TARGET.to_string(),
                value: label.to_string(),
            })
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Array1<f64>, PreprocessingError> {
        labels
            .iter()
            .map(|l| self.encode(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }

    /// Map codes back to their class labels.
    pub fn inverse_transform(&self, codes: &Array1<f64>) -> Result<Vec<String>, PreprocessingError> {
        codes
            .iter()
            .map(|&c| {
                let idx = c as usize;
                if c < 0.0 || c.fract() != 0.0 || idx >= self.n_classes() {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "{} is not a valid class code",
                        c
                    )));
                }
                Ok(self.classes.categories()[idx].clone())
            })
            .collect()
    }

    pub fn extract_params(&self) -> LabelEncoderParams {
        LabelEncoderParams {
            classes: self.classes.clone(),
        }
    }

    pub fn from_params(params: LabelEncoderParams) -> Result<Self, PreprocessingError> {
        if params.classes.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "LabelEncoder needs at least one class".to_string(),
            ));
        }
        Ok(Self {
            classes: params.classes,
        })
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        Self::from_params(LabelEncoderParams::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_binary_census_target() {
        let labels = ["<=50K", ">50K", "<=50K", "<=50K"];
        let (fitted, encoded) = LabelEncoder::new().fit_transform(&labels).unwrap();
        assert_eq!(fitted.classes(), &["<=50K", ">50K"]);
        assert_eq!(encoded.to_vec(), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_inverse_transform() {
        let fitted = LabelEncoder::new().fit(&["b", "a", "c"]).unwrap();
        let codes = Array1::from(vec![2.0, 0.0]);
        assert_eq!(fitted.inverse_transform(&codes).unwrap(), vec!["c", "a"]);
        assert!(fitted.inverse_transform(&Array1::from(vec![3.0])).is_err());
        assert!(fitted.inverse_transform(&Array1::from(vec![0.5])).is_err());
    }

    #[test]
    fn test_unknown_label() {
        let fitted = LabelEncoder::new().fit(&["a"]).unwrap();
        assert!(matches!(
            fitted.transform(&["b"]),
            Err(PreprocessingError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_empty_labels() {
        let empty: [&str; 0] = [];
        assert!(LabelEncoder::new().fit(&empty).is_err());
    }

    #[test]
    fn test_save_load() {
        let fitted = LabelEncoder::new().fit(&["no", "yes"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.bin");
        fitted.save_to_file(&path).unwrap();
        let loaded = FittedLabelEncoder::load_from_file(&path).unwrap();
        assert_eq!(loaded.classes(), fitted.classes());
    }
}
