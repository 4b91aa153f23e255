//! Model selection: hold-out splits and k-fold cross-validation.

mod cross_validation;
mod split;

pub use cross_validation::{
    cross_val_score, cross_validate, CrossValidator, CvScores, CvSplit, CvStrategy, FoldReport,
};
pub use split::{train_test_split, TrainTestSplit};
