use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::dataset::Table;
use crate::error::PipelineError;

/// Result of [`train_test_split`].
#[derive(Clone, Debug)]
pub struct TrainTestSplit {
    pub x_train: Table,
    pub x_test: Table,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffle rows with a seeded `ChaCha8Rng` and hold out `ceil(test_size * n)` of them.
///
/// Both partitions must end up non-empty.
pub fn train_test_split(
    data: &Table,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit, PipelineError> {
    let n = data.n_rows();
    if y.len() != n {
        return Err(PipelineError::TargetLength {
            expected: n,
            got: y.len(),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::InvalidSplit(format!(
            "test_size {} leaves an empty partition for {} rows",
            test_size, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);
    debug!(n_train = train_idx.len(), n_test, seed, "train/test split");

    Ok(TrainTestSplit {
        x_train: data.take_rows(train_idx)?,
        x_test: data.take_rows(test_idx)?,
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn table(n: usize) -> (Table, Array1<f64>) {
        let ids: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let table = Table::from_columns(vec![("id", Column::Numeric(ids.clone()))]).unwrap();
        (table, Array1::from(ids))
    }

    #[test]
    fn test_split_sizes_and_alignment() {
        let (data, y) = table(10);
        let split = train_test_split(&data, &y, 0.25, 42).unwrap();
        assert_eq!(split.x_test.n_rows(), 3);
        assert_eq!(split.x_train.n_rows(), 7);

        let test_ids = split.x_test.numeric_column("id").unwrap();
        assert_eq!(test_ids, split.y_test.as_slice().unwrap());

        let mut all: Vec<f64> = test_ids
            .iter()
            .chain(split.x_train.numeric_column("id").unwrap())
            .copied()
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        let (data, y) = table(20);
        let a = train_test_split(&data, &y, 0.3, 7).unwrap();
        let b = train_test_split(&data, &y, 0.3, 7).unwrap();
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_split_rejects_empty_partition() {
        let (data, y) = table(2);
        assert!(matches!(
            train_test_split(&data, &y, 0.9, 0),
            Err(PipelineError::InvalidSplit(_))
        ));
        assert!(matches!(
            train_test_split(&data, &y, 0.0, 0),
            Err(PipelineError::InvalidSplit(_))
        ));
    }
}
