//! Classifiers trained on dense feature matrices.
//!
//! Like the preprocessing transformers, classifiers follow a two-type pattern:
//! a [`Classifier`] holds hyperparameters and produces a [`FittedClassifier`]
//! holding only what inference needs.

pub mod error;
pub mod logistic;

pub use error::ModelError;
pub use logistic::{
    FittedLogisticRegression, LogisticRegression, LogisticRegressionConfig,
    LogisticRegressionParams,
};

use ndarray::{Array1, Array2};

use crate::metrics;
use crate::serialization::SerializableParams;

/// Unfitted classifier.
pub trait Classifier: Clone + std::fmt::Debug {
    type Fitted: FittedClassifier;

    /// Train on `x` (samples by features) and labels `y`.
    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Fitted, ModelError>;
}

/// Trained classifier ready for inference.
pub trait FittedClassifier: Clone + std::fmt::Debug {
    type Params: SerializableParams;

    fn n_features_in(&self) -> usize;

    /// Probability of the positive class for each row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Predicted class label for each row.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Accuracy of `predict(x)` against `y`.
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64, ModelError> {
        let y_pred = self.predict(x)?;
        metrics::accuracy(y, &y_pred)
    }

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self, ModelError>
    where
        Self: Sized;
}
