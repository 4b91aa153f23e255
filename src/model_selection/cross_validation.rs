//! K-fold cross-validation of [`Pipeline`]s.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::Table;
use crate::error::PipelineError;
use crate::metrics;
use crate::model::Classifier;
use crate::pipeline::Pipeline;

/// How rows are assigned to folds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvStrategy {
    /// Contiguous folds in row order, or in a seeded shuffled order.
    KFold { n_splits: usize, shuffle: bool },
    /// Folds that keep each class's share roughly constant.
    StratifiedKFold { n_splits: usize, shuffle: bool },
}

impl Default for CvStrategy {
    fn default() -> Self {
        CvStrategy::KFold {
            n_splits: 5,
            shuffle: false,
        }
    }
}

impl CvStrategy {
    pub fn n_splits(&self) -> usize {
        match self {
            CvStrategy::KFold { n_splits, .. } | CvStrategy::StratifiedKFold { n_splits, .. } => {
                *n_splits
            }
        }
    }
}

/// A single train/test split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CvSplit {
    pub fold_idx: usize,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Fold splitter plus execution settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossValidator {
    strategy: CvStrategy,
    seed: u64,
    parallel: bool,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new(CvStrategy::default())
    }
}

impl CrossValidator {
    pub fn new(strategy: CvStrategy) -> Self {
        Self {
            strategy,
            seed: 0,
            parallel: true,
        }
    }

    /// Unshuffled k-fold.
    pub fn k_fold(n_splits: usize) -> Self {
        Self::new(CvStrategy::KFold {
            n_splits,
            shuffle: false,
        })
    }

    /// Seed used when the strategy shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run folds on the rayon pool (default) or one after another.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn strategy(&self) -> CvStrategy {
        self.strategy
    }

    pub fn n_splits(&self) -> usize {
        self.strategy.n_splits()
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Generate train/test index sets. `y` is required for stratified folds.
    pub fn split(
        &self,
        n_samples: usize,
        y: Option<&Array1<f64>>,
    ) -> Result<Vec<CvSplit>, PipelineError> {
        let n_splits = self.n_splits();
        if n_splits < 2 {
            return Err(PipelineError::InvalidSplit(format!(
                "n_splits must be at least 2, got {}",
                n_splits
            )));
        }
        if n_samples < n_splits {
            return Err(PipelineError::InvalidSplit(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, n_splits
            )));
        }

        let folds = match self.strategy {
            CvStrategy::KFold { shuffle, .. } => self.k_fold_folds(n_samples, n_splits, shuffle),
            CvStrategy::StratifiedKFold { shuffle, .. } => {
                let y = y.ok_or_else(|| {
                    PipelineError::InvalidSplit("stratified folds require a target".to_string())
                })?;
                if y.len() != n_samples {
                    return Err(PipelineError::TargetLength {
                        expected: n_samples,
                        got: y.len(),
                    });
                }
                self.stratified_folds(y, n_splits, shuffle)
            }
        };

        Ok(folds_to_splits(folds))
    }

    fn k_fold_folds(&self, n_samples: usize, n_splits: usize, shuffle: bool) -> Vec<Vec<usize>> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        if shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }

        let base = n_samples / n_splits;
        let remainder = n_samples % n_splits;
        let mut folds = Vec::with_capacity(n_splits);
        let mut current = 0;
        for fold_idx in 0..n_splits {
            let size = if fold_idx < remainder { base + 1 } else { base };
            folds.push(indices[current..current + size].to_vec());
            current += size;
        }
        folds
    }

    fn stratified_folds(&self, y: &Array1<f64>, n_splits: usize, shuffle: bool) -> Vec<Vec<usize>> {
        let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in y.iter().enumerate() {
            by_class.entry(label.round() as i64).or_default().push(idx);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); n_splits];
        // Offset carries over between classes so fold sizes stay within one.
        let mut offset = 0;
        for indices in by_class.values_mut() {
            if shuffle {
                indices.shuffle(&mut rng);
            }
            for &idx in indices.iter() {
                folds[offset % n_splits].push(idx);
                offset += 1;
            }
        }
        for fold in &mut folds {
            fold.sort_unstable();
        }
        folds
    }
}

fn folds_to_splits(folds: Vec<Vec<usize>>) -> Vec<CvSplit> {
    (0..folds.len())
        .map(|fold_idx| CvSplit {
            fold_idx,
            train_indices: folds
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != fold_idx)
                .flat_map(|(_, f)| f.iter().copied())
                .collect(),
            test_indices: folds[fold_idx].clone(),
        })
        .collect()
}

/// Outcome of one fold.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldReport {
    pub fold: usize,
    pub score: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub fit_time: Duration,
}

/// Per-fold accuracies in fold order.
#[derive(Clone, Debug, PartialEq)]
pub struct CvScores {
    scores: Vec<f64>,
}

impl CvScores {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn mean(&self) -> f64 {
        metrics::mean(&self.scores)
    }

    /// Population standard deviation.
    pub fn std(&self) -> f64 {
        metrics::std(&self.scores)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl From<&[FoldReport]> for CvScores {
    fn from(reports: &[FoldReport]) -> Self {
        Self::new(reports.iter().map(|r| r.score).collect())
    }
}

fn run_fold<C, F>(
    factory: &F,
    data: &Table,
    y: &Array1<f64>,
    split: &CvSplit,
) -> Result<FoldReport, PipelineError>
where
    C: Classifier,
    F: Fn() -> Pipeline<C>,
{
    let x_train = data.take_rows(&split.train_indices)?;
    let x_test = data.take_rows(&split.test_indices)?;
    let y_train: Array1<f64> = split.train_indices.iter().map(|&i| y[i]).collect();
    let y_test: Array1<f64> = split.test_indices.iter().map(|&i| y[i]).collect();

    let mut model = factory();
    let start = Instant::now();
    model.fit(&x_train, &y_train)?;
    let fit_time = start.elapsed();
    let score = model.score(&x_test, &y_test)?;

    info!(
        fold = split.fold_idx,
        score,
        n_train = split.train_indices.len(),
        n_test = split.test_indices.len(),
        fit_ms = fit_time.as_millis() as u64,
        "fold evaluated"
    );

    Ok(FoldReport {
        fold: split.fold_idx,
        score,
        n_train: split.train_indices.len(),
        n_test: split.test_indices.len(),
        fit_time,
    })
}

/// Fit a fresh pipeline from `factory` on each training fold and score it on
/// the held-out fold. Reports come back in fold order.
pub fn cross_validate<C, F>(
    factory: F,
    data: &Table,
    y: &Array1<f64>,
    cv: &CrossValidator,
) -> Result<Vec<FoldReport>, PipelineError>
where
    C: Classifier,
    F: Fn() -> Pipeline<C> + Sync,
{
    if y.len() != data.n_rows() {
        return Err(PipelineError::TargetLength {
            expected: data.n_rows(),
            got: y.len(),
        });
    }
    let splits = cv.split(data.n_rows(), Some(y))?;

    if cv.is_parallel() {
        splits
            .par_iter()
            .map(|split| run_fold(&factory, data, y, split))
            .collect()
    } else {
        splits
            .iter()
            .map(|split| run_fold(&factory, data, y, split))
            .collect()
    }
}

/// Accuracy of a fresh pipeline per fold.
///
/// # Example
/// ```
/// use ndarray::Array1;
/// use tabprep::dataset::{Column, ColumnSelector, Table};
/// use tabprep::model::LogisticRegression;
/// use tabprep::model_selection::{cross_val_score, CrossValidator};
/// use tabprep::pipeline::Pipeline;
/// use tabprep::preprocessing::{ColumnTransformer, StandardScaler};
///
/// let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
/// let y: Array1<f64> = x.iter().map(|&v| if v % 2.0 == 0.0 { 0.0 } else { 1.0 }).collect();
/// let table = Table::from_columns(vec![("x", Column::Numeric(x))]).unwrap();
///
/// let factory = || {
///     Pipeline::new(
///         ColumnTransformer::new()
///             .add_standard_scaler("num", StandardScaler::new(), ColumnSelector::All),
///         LogisticRegression::new(),
///     )
/// };
/// let scores = cross_val_score(factory, &table, &y, &CrossValidator::k_fold(4)).unwrap();
/// assert_eq!(scores.len(), 4);
/// ```
pub fn cross_val_score<C, F>(
    factory: F,
    data: &Table,
    y: &Array1<f64>,
    cv: &CrossValidator,
) -> Result<CvScores, PipelineError>
where
    C: Classifier,
    F: Fn() -> Pipeline<C> + Sync,
{
    let reports = cross_validate(factory, data, y, cv)?;
    Ok(CvScores::from(reports.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnSelector};
    use crate::model::LogisticRegression;
    use crate::preprocessing::{ColumnTransformer, StandardScaler};

    fn check_partition(splits: &[CvSplit], n: usize) {
        let mut seen = vec![0usize; n];
        for split in splits {
            assert_eq!(split.train_indices.len() + split.test_indices.len(), n);
            for &i in &split.test_indices {
                seen[i] += 1;
                assert!(!split.train_indices.contains(&i));
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_k_fold_contiguous() {
        let splits = CrossValidator::k_fold(5).split(100, None).unwrap();
        assert_eq!(splits.len(), 5);
        for (i, split) in splits.iter().enumerate() {
            assert_eq!(split.fold_idx, i);
            assert_eq!(split.test_indices, (i * 20..(i + 1) * 20).collect::<Vec<_>>());
            assert_eq!(split.train_indices.len(), 80);
        }
        check_partition(&splits, 100);
    }

    #[test]
    fn test_k_fold_remainder_goes_first() {
        let splits = CrossValidator::k_fold(3).split(10, None).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test_indices.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        check_partition(&splits, 10);
    }

    #[test]
    fn test_shuffled_k_fold_is_seeded() {
        let cv = CrossValidator::new(CvStrategy::KFold {
            n_splits: 4,
            shuffle: true,
        })
        .with_seed(11);
        let a = cv.split(40, None).unwrap();
        let b = cv.split(40, None).unwrap();
        assert_eq!(a, b);
        check_partition(&a, 40);
        assert_ne!(a[0].test_indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_keeps_class_balance() {
        let y: Array1<f64> = (0..30).map(|i| if i < 10 { 1.0 } else { 0.0 }).collect();
        let cv = CrossValidator::new(CvStrategy::StratifiedKFold {
            n_splits: 5,
            shuffle: true,
        });
        let splits = cv.split(30, Some(&y)).unwrap();
        check_partition(&splits, 30);
        for split in &splits {
            assert_eq!(split.test_indices.len(), 6);
            let positives = split.test_indices.iter().filter(|&&i| y[i] == 1.0).count();
            assert_eq!(positives, 2);
        }
    }

    #[test]
    fn test_stratified_requires_target() {
        let cv = CrossValidator::new(CvStrategy::StratifiedKFold {
            n_splits: 2,
            shuffle: false,
        });
        assert!(matches!(
            cv.split(10, None),
            Err(PipelineError::InvalidSplit(_))
        ));
    }

    #[test]
    fn test_invalid_split_settings() {
        assert!(matches!(
            CrossValidator::k_fold(1).split(10, None),
            Err(PipelineError::InvalidSplit(_))
        ));
        assert!(matches!(
            CrossValidator::k_fold(5).split(3, None),
            Err(PipelineError::InvalidSplit(_))
        ));
    }

    #[test]
    fn test_cv_scores_stats() {
        let scores = CvScores::new(vec![0.8, 0.82, 0.84]);
        assert_eq!(scores.len(), 3);
        assert!((scores.mean() - 0.82).abs() < 1e-12);
        assert!(scores.std() > 0.0);
    }

    fn fixture() -> (Table, Array1<f64>) {
        let n = 60;
        let x: Vec<f64> = (0..n).map(|i| (i % 12) as f64).collect();
        let y: Array1<f64> = x.iter().map(|&v| if v >= 6.0 { 1.0 } else { 0.0 }).collect();
        let table = Table::from_columns(vec![("x", Column::Numeric(x))]).unwrap();
        (table, y)
    }

    fn factory() -> Pipeline<LogisticRegression> {
        Pipeline::new(
            ColumnTransformer::new().add_standard_scaler(
                "num",
                StandardScaler::new(),
                ColumnSelector::numeric(),
            ),
            LogisticRegression::new().with_max_iter(300),
        )
    }

    #[test]
    fn test_cross_validate_reports() {
        let (table, y) = fixture();
        let reports = cross_validate(factory, &table, &y, &CrossValidator::k_fold(5)).unwrap();
        assert_eq!(reports.len(), 5);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.fold, i);
            assert_eq!(report.n_test, 12);
            assert_eq!(report.n_train, 48);
            assert!(report.score > 0.9);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (table, y) = fixture();
        let cv = CrossValidator::k_fold(3);
        let parallel = cross_val_score(factory, &table, &y, &cv).unwrap();
        let sequential =
            cross_val_score(factory, &table, &y, &cv.clone().with_parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_cross_validate_target_length() {
        let (table, _) = fixture();
        let y = Array1::from(vec![0.0, 1.0]);
        assert!(matches!(
            cross_val_score(factory, &table, &y, &CrossValidator::default()),
            Err(PipelineError::TargetLength { .. })
        ));
    }
}
