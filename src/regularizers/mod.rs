//! Weight penalties added to a training loss.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Penalty on the coefficient vector. The intercept is never penalized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    None,
    /// `0.5 * alpha * ||w||^2`
    L2 { alpha: f64 },
}

impl Default for Penalty {
    fn default() -> Self {
        Penalty::L2 { alpha: 0.01 }
    }
}

impl Penalty {
    /// Penalty value and its gradient with respect to `weights`.
    pub fn penalty_grad(&self, weights: &Array1<f64>) -> (f64, Array1<f64>) {
        match *self {
            Penalty::None => (0.0, Array1::zeros(weights.len())),
            Penalty::L2 { alpha } => (0.5 * alpha * weights.dot(weights), weights * alpha),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Penalty::L2 { alpha } if !(alpha >= 0.0 && alpha.is_finite()) => {
                Err(format!("L2 alpha must be finite and non-negative, got {}", alpha))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_penalty_grad() {
        let w = Array1::from(vec![1.0, -2.0]);
        let (value, grad) = Penalty::L2 { alpha: 0.5 }.penalty_grad(&w);
        assert!((value - 1.25).abs() < 1e-12);
        assert_eq!(grad.to_vec(), vec![0.5, -1.0]);
    }

    #[test]
    fn test_no_penalty() {
        let w = Array1::from(vec![3.0]);
        let (value, grad) = Penalty::None.penalty_grad(&w);
        assert_eq!(value, 0.0);
        assert_eq!(grad.to_vec(), vec![0.0]);
    }

    #[test]
    fn test_validate() {
        assert!(Penalty::L2 { alpha: -1.0 }.validate().is_err());
        assert!(Penalty::L2 { alpha: f64::NAN }.validate().is_err());
        assert!(Penalty::default().validate().is_ok());
    }
}
