//! Metrics for evaluating classifiers and summarising fold scores.

use ndarray::{Array1, ArrayView1};

use crate::model::ModelError;

/// Fraction of predictions equal to the true label.
///
/// accuracy = mean(y_true == y_pred)
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64, ModelError> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::ShapeMismatch {
            expected: format!("{} predictions", y_true.len()),
            got: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(ModelError::EmptyData(
            "accuracy is undefined for zero samples".to_string(),
        ));
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of `values`, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    ArrayView1::from(values).mean().unwrap_or(0.0)
}

/// Population standard deviation (ddof = 0) of `values`.
pub fn std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    ArrayView1::from(values).std(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let y_true = Array1::from(vec![0.0, 1.0, 1.0, 0.0]);
        let y_pred = Array1::from(vec![0.0, 1.0, 0.0, 0.0]);
        assert!((accuracy(&y_true, &y_pred).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_errors() {
        let a = Array1::from(vec![0.0, 1.0]);
        let b = Array1::from(vec![0.0]);
        assert!(matches!(
            accuracy(&a, &b),
            Err(ModelError::ShapeMismatch { .. })
        ));
        let empty = Array1::<f64>::zeros(0);
        assert!(matches!(
            accuracy(&empty, &empty),
            Err(ModelError::EmptyData(_))
        ));
    }

    #[test]
    fn test_mean_std() {
        let values = [0.8, 0.82, 0.84];
        assert!((mean(&values) - 0.82).abs() < 1e-12);
        let expected = ((0.0004 + 0.0 + 0.0004) / 3.0f64).sqrt();
        assert!((std(&values) - expected).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std(&[]), 0.0);
    }
}
