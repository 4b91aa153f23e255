//! Estimator pipeline: a column-wise preprocessor followed by a classifier.
//!
//! [`Pipeline`] is the trainable object handed to cross-validation. Fitting it
//! learns the preprocessor on the training rows only, turns them into a dense
//! matrix and trains the classifier on that. [`FittedPipeline`] is the
//! inference-only product, which can be saved as a single file.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::Table;
use crate::error::PipelineError;
use crate::model::{Classifier, FittedClassifier, ModelError};
use crate::preprocessing::{
    ColumnTransformer, ColumnTransformerParams, FittedColumnTransformer, FittedTransformer,
    PreprocessingError, Transformer,
};
use crate::serialization::SerializableParams;

/// Preprocessor plus classifier, fitted together.
///
/// # Example
/// ```
/// use ndarray::Array1;
/// use tabprep::dataset::{Column, ColumnSelector, Table};
/// use tabprep::model::LogisticRegression;
/// use tabprep::pipeline::Pipeline;
/// use tabprep::preprocessing::{ColumnTransformer, StandardScaler};
///
/// let table = Table::from_columns(vec![(
///     "age",
///     Column::Numeric(vec![20.0, 25.0, 30.0, 50.0, 55.0, 60.0]),
/// )])
/// .unwrap();
/// let y = Array1::from(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
///
/// let preprocessor = ColumnTransformer::new()
///     .add_standard_scaler("scaler", StandardScaler::new(), ColumnSelector::numeric());
/// let mut model = Pipeline::new(preprocessor, LogisticRegression::new());
/// assert!(model.predict(&table).is_err());
///
/// model.fit(&table, &y).unwrap();
/// assert_eq!(model.score(&table, &y).unwrap(), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct Pipeline<C: Classifier> {
    preprocessor: ColumnTransformer,
    classifier: C,
    fitted: Option<FittedPipeline<C::Fitted>>,
}

impl<C: Classifier> Pipeline<C> {
    pub fn new(preprocessor: ColumnTransformer, classifier: C) -> Self {
        Self {
            preprocessor,
            classifier,
            fitted: None,
        }
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit preprocessor and classifier on `data` and `y`.
    ///
    /// Any previous fitted state is replaced only once the new fit succeeds.
    pub fn fit(&mut self, data: &Table, y: &Array1<f64>) -> Result<&mut Self, PipelineError> {
        if y.len() != data.n_rows() {
            return Err(PipelineError::TargetLength {
                expected: data.n_rows(),
                got: y.len(),
            });
        }

        let preprocessor = self.preprocessor.fit(data)?;
        let features = preprocessor.transform(data)?.to_array()?;
        let model = self.classifier.fit(&features, y)?;
        info!(
            rows = data.n_rows(),
            features = features.ncols(),
            "fitted pipeline"
        );

        self.fitted = Some(FittedPipeline { preprocessor, model });
        Ok(self)
    }

    /// Fitted state, if `fit` has succeeded.
    pub fn fitted(&self) -> Option<&FittedPipeline<C::Fitted>> {
        self.fitted.as_ref()
    }

    /// Consume the pipeline and keep only its fitted state.
    pub fn into_fitted(self) -> Result<FittedPipeline<C::Fitted>, PipelineError> {
        self.fitted.ok_or(PipelineError::NotFitted("into_fitted"))
    }

    fn require_fitted(&self, op: &'static str) -> Result<&FittedPipeline<C::Fitted>, PipelineError> {
        self.fitted.as_ref().ok_or(PipelineError::NotFitted(op))
    }

    /// Apply the fitted preprocessor.
    pub fn transform(&self, data: &Table) -> Result<Table, PipelineError> {
        self.require_fitted("transform")?.transform(data)
    }

    pub fn predict(&self, data: &Table) -> Result<Array1<f64>, PipelineError> {
        self.require_fitted("predict")?.predict(data)
    }

    pub fn predict_proba(&self, data: &Table) -> Result<Array1<f64>, PipelineError> {
        self.require_fitted("predict_proba")?.predict_proba(data)
    }

    /// Accuracy on `data` against `y`.
    pub fn score(&self, data: &Table, y: &Array1<f64>) -> Result<f64, PipelineError> {
        self.require_fitted("score")?.score(data, y)
    }
}

/// Serializable parameters for a fitted pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPipelineParams {
    /// Preprocessor parameters.
    pub preprocessor: Vec<u8>,
    /// Model parameters.
    pub model: Vec<u8>,
}

/// Fitted preprocessor and classifier, ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline<M: FittedClassifier> {
    preprocessor: FittedColumnTransformer,
    model: M,
}

impl<M: FittedClassifier> FittedPipeline<M> {
    pub fn new(preprocessor: FittedColumnTransformer, model: M) -> Result<Self, PipelineError> {
        if preprocessor.n_features_out() != model.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: model.n_features_in(),
                got_features: preprocessor.n_features_out(),
            }
            .into());
        }
        Ok(Self { preprocessor, model })
    }

    pub fn preprocessor(&self) -> &FittedColumnTransformer {
        &self.preprocessor
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn transform(&self, data: &Table) -> Result<Table, PipelineError> {
        Ok(self.preprocessor.transform(data)?)
    }

    fn features(&self, data: &Table) -> Result<Array2<f64>, PipelineError> {
        Ok(self.preprocessor.transform(data)?.to_array()?)
    }

    pub fn predict(&self, data: &Table) -> Result<Array1<f64>, PipelineError> {
        Ok(self.model.predict(&self.features(data)?)?)
    }

    pub fn predict_proba(&self, data: &Table) -> Result<Array1<f64>, PipelineError> {
        Ok(self.model.predict_proba(&self.features(data)?)?)
    }

    pub fn score(&self, data: &Table, y: &Array1<f64>) -> Result<f64, PipelineError> {
        if y.len() != data.n_rows() {
            return Err(PipelineError::TargetLength {
                expected: data.n_rows(),
                got: y.len(),
            });
        }
        Ok(self.model.score(&self.features(data)?, y)?)
    }

    pub fn extract_params(&self) -> Result<FittedPipelineParams, PipelineError> {
        let preprocessor = self
            .preprocessor
            .extract_params()
            .to_bytes()
            .map_err(PreprocessingError::from)?;
        let model = self
            .model
            .extract_params()
            .to_bytes()
            .map_err(|e| ModelError::SerializationError(e.to_string()))?;
        Ok(FittedPipelineParams { preprocessor, model })
    }

    pub fn from_params(params: FittedPipelineParams) -> Result<Self, PipelineError> {
        let preprocessor = FittedColumnTransformer::from_params(
            ColumnTransformerParams::from_bytes(&params.preprocessor)
                .map_err(PreprocessingError::from)?,
        )?;
        let model = M::from_params(
            M::Params::from_bytes(&params.model)
                .map_err(|e| ModelError::SerializationError(e.to_string()))?,
        )?;
        Self::new(preprocessor, model)
    }

    /// Save the fitted pipeline to a file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PipelineError> {
        let bytes = self
            .extract_params()?
            .to_bytes()
            .map_err(PreprocessingError::from)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted pipeline from a file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path)?;
        let params = FittedPipelineParams::from_bytes(&bytes).map_err(PreprocessingError::from)?;
        Self::from_params(params)
    }
}
