//! Differentiable loss functions for linear classifiers.

use ndarray::Array1;

/// A loss over a batch of predictions, with its gradient.
pub trait Loss {
    /// Mean loss over the batch.
    fn loss(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> f64;

    /// Gradient of the mean loss with respect to each prediction.
    fn grad_wrt_prediction(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> Array1<f64>;
}

/// Numerically stable logistic sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Binary cross-entropy on raw logits.
#[derive(Clone, Copy, Debug, Default)]
pub struct BCEWithLogitsLoss;

impl Loss for BCEWithLogitsLoss {
    fn loss(&self, logits: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        // -(t * log(s(z)) + (1-t) * log(1 - s(z)))
        // = max(z, 0) - z * t + log(1 + exp(-|z|))
        let n = logits.len();
        if n == 0 {
            return 0.0;
        }
        let total: f64 = logits
            .iter()
            .zip(targets.iter())
            .map(|(&z, &t)| z.max(0.0) - z * t + (-z.abs()).exp().ln_1p())
            .sum();
        total / n as f64
    }

    fn grad_wrt_prediction(&self, logits: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        // d/dz BCE = sigmoid(z) - t
        let n = logits.len().max(1) as f64;
        let mut grad = logits.mapv(sigmoid);
        grad -= targets;
        grad / n
    }
}
