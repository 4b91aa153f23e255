//! Binary logistic regression trained by full-batch gradient descent.
//!
//! The objective is the mean binary cross-entropy on logits plus an optional
//! penalty on the coefficients. Training stops when the gradient norm drops
//! below `tol` or after `max_iter` iterations; in the latter case a warning is
//! logged and the fitted model records `converged = false`.
//!
//! Gradient descent is sensitive to feature scale: unscaled inputs such as raw
//! capital gains usually need many more iterations than standardized ones.

use std::time::Instant;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::loss::{sigmoid, BCEWithLogitsLoss, Loss};
use crate::model::{Classifier, FittedClassifier, ModelError};
use crate::regularizers::Penalty;

/// Hyperparameters for [`LogisticRegression`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionConfig {
    /// Maximum number of gradient steps.
    pub max_iter: usize,
    /// Stop once the gradient norm is below this value.
    pub tol: f64,
    pub learning_rate: f64,
    pub penalty: Penalty,
    pub fit_intercept: bool,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-4,
            learning_rate: 0.5,
            penalty: Penalty::default(),
            fit_intercept: true,
        }
    }
}

/// Logistic regression for binary classification (unfitted).
///
/// # Example
/// ```
/// use ndarray::{array, Array1};
/// use tabprep::model::{Classifier, FittedClassifier, LogisticRegression};
///
/// let x = array![[-2.0], [-1.0], [1.0], [2.0]];
/// let y = Array1::from(vec![0.0, 0.0, 1.0, 1.0]);
/// let fitted = LogisticRegression::new().with_max_iter(500).fit(&x, &y).unwrap();
/// assert_eq!(fitted.score(&x, &y).unwrap(), 1.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: LogisticRegressionConfig) -> Self {
        Self { config }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.config.learning_rate = lr;
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.config.penalty = penalty;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.config.fit_intercept = fit_intercept;
        self
    }

    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }

    fn validate(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let c = &self.config;
        if c.max_iter == 0 {
            return Err(ModelError::InvalidParameter("max_iter must be at least 1".to_string()));
        }
        if !(c.learning_rate > 0.0 && c.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                c.learning_rate
            )));
        }
        if c.tol.is_nan() || c.tol < 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "tol must be non-negative, got {}",
                c.tol
            )));
        }
        c.penalty.validate().map_err(ModelError::InvalidParameter)?;

        if x.nrows() == 0 {
            return Err(ModelError::EmptyData(
                "Cannot fit LogisticRegression on empty data".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("y length = {}", x.nrows()),
                got: format!("y length = {}", y.len()),
            });
        }
        if let Some(&bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(ModelError::InvalidLabel(bad));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter(
                "feature matrix contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    type Fitted = FittedLogisticRegression;

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Fitted, ModelError> {
        self.validate(x, y)?;

        let start = Instant::now();
        let c = &self.config;
        let loss_fn = BCEWithLogitsLoss;
        let mut weights: Array1<f64> = Array1::zeros(x.ncols());
        let mut bias = 0.0;
        let mut n_iter = 0;
        let mut converged = false;

        for iter in 0..c.max_iter {
            let logits = x.dot(&weights) + bias;
            let grad_logits = loss_fn.grad_wrt_prediction(&logits, y);

            let (_, penalty_grad) = c.penalty.penalty_grad(&weights);
            let dw = x.t().dot(&grad_logits) + penalty_grad;
            let db = if c.fit_intercept { grad_logits.sum() } else { 0.0 };

            n_iter = iter + 1;
            let grad_norm = (dw.dot(&dw) + db * db).sqrt();
            if grad_norm < c.tol {
                converged = true;
                break;
            }

            weights.scaled_add(-c.learning_rate, &dw);
            bias -= c.learning_rate * db;
        }

        let logits = x.dot(&weights) + bias;
        let final_loss = loss_fn.loss(&logits, y) + c.penalty.penalty_grad(&weights).0;

        if converged {
            debug!(
                n_iter,
                loss = final_loss,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "LogisticRegression converged"
            );
        } else {
            warn!(
                max_iter = c.max_iter,
                loss = final_loss,
                "LogisticRegression failed to converge; increase max_iter or scale the data"
            );
        }

        Ok(FittedLogisticRegression {
            coefficients: weights,
            intercept: bias,
            n_iter,
            converged,
            final_loss,
        })
    }
}

/// Serializable parameters for a fitted LogisticRegression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub n_iter: usize,
    pub converged: bool,
    pub final_loss: f64,
}

/// Fitted logistic regression.
#[derive(Clone, Debug)]
pub struct FittedLogisticRegression {
    coefficients: Array1<f64>,
    intercept: f64,
    n_iter: usize,
    converged: bool,
    final_loss: f64,
}

impl FittedLogisticRegression {
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of gradient steps taken during fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Training objective at the returned coefficients.
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<(), ModelError> {
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} features", self.coefficients.len()),
                got: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    /// Raw logits `x . w + b`.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        self.check_width(x)?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

impl FittedClassifier for FittedLogisticRegression {
    type Params = LogisticRegressionParams;

    fn n_features_in(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    fn extract_params(&self) -> Self::Params {
        LogisticRegressionParams {
            coefficients: self.coefficients.to_vec(),
            intercept: self.intercept,
            n_iter: self.n_iter,
            converged: self.converged,
            final_loss: self.final_loss,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, ModelError> {
        if params.coefficients.iter().any(|v| !v.is_finite()) || !params.intercept.is_finite() {
            return Err(ModelError::InvalidParameter(
                "coefficients must be finite".to_string(),
            ));
        }
        Ok(Self {
            coefficients: Array1::from(params.coefficients),
            intercept: params.intercept,
            n_iter: params.n_iter,
            converged: params.converged,
            final_loss: params.final_loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [-2.0, 0.5],
            [-1.5, -0.3],
            [-1.0, 0.2],
            [-0.5, -0.1],
            [0.5, 0.1],
            [1.0, -0.2],
            [1.5, 0.3],
            [2.0, -0.5]
        ];
        let y = Array1::from(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new().with_max_iter(1000).fit(&x, &y).unwrap();
        assert_eq!(fitted.score(&x, &y).unwrap(), 1.0);
        assert!(fitted.coefficients()[0] > 0.0);
        assert_eq!(fitted.n_features_in(), 2);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new().fit(&x, &y).unwrap();
        for p in fitted.predict_proba(&x).unwrap().iter() {
            assert!((0.0..=1.0).contains(p));
        }
    }

    #[test]
    fn test_convergence_is_recorded() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new()
            .with_max_iter(5000)
            .with_tol(1e-3)
            .fit(&x, &y)
            .unwrap();
        assert!(fitted.converged());
        assert!(fitted.n_iter() < 5000);

        let capped = LogisticRegression::new().with_max_iter(2).fit(&x, &y).unwrap();
        assert!(!capped.converged());
        assert_eq!(capped.n_iter(), 2);
    }

    #[test]
    fn test_unscaled_features_exhaust_default_max_iter() {
        // age, capital-gain
        let x = array![
            [25.0, 0.0],
            [38.0, 0.0],
            [28.0, 0.0],
            [44.0, 7688.0],
            [18.0, 0.0],
            [34.0, 0.0],
            [29.0, 0.0],
            [63.0, 3103.0]
        ];
        let y = Array1::from(vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let fitted = LogisticRegression::new().fit(&x, &y).unwrap();
        assert!(!fitted.converged());
        assert_eq!(fitted.n_iter(), 100);
    }

    #[test]
    fn test_loss_decreases_with_training() {
        let (x, y) = separable();
        let short = LogisticRegression::new().with_max_iter(1).fit(&x, &y).unwrap();
        let long = LogisticRegression::new().with_max_iter(200).fit(&x, &y).unwrap();
        assert!(long.final_loss() < short.final_loss());
    }

    #[test]
    fn test_rejects_non_binary_labels() {
        let (x, _) = separable();
        let y = Array1::from(vec![0.0, 1.0, 2.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        assert_eq!(
            LogisticRegression::new().fit(&x, &y).unwrap_err(),
            ModelError::InvalidLabel(2.0)
        );
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let (x, _) = separable();
        let y = Array1::from(vec![0.0, 1.0]);
        assert!(matches!(
            LogisticRegression::new().fit(&x, &y),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_hyperparameters() {
        let (x, y) = separable();
        assert!(LogisticRegression::new().with_max_iter(0).fit(&x, &y).is_err());
        assert!(LogisticRegression::new().with_learning_rate(0.0).fit(&x, &y).is_err());
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new().fit(&x, &y).unwrap();
        let narrow = array![[1.0]];
        assert!(matches!(
            fitted.predict(&narrow),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_without_intercept() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new()
            .with_fit_intercept(false)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.intercept(), 0.0);
    }

    #[test]
    fn test_params_roundtrip() {
        let (x, y) = separable();
        let fitted = LogisticRegression::new().fit(&x, &y).unwrap();
        let restored = FittedLogisticRegression::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            restored.predict_proba(&x).unwrap(),
            fitted.predict_proba(&x).unwrap()
        );
    }
}
