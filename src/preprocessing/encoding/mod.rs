//! Categorical feature encoding transformers.
//!
//! This module provides encoders for converting categorical (string) columns to
//! numerical representations that can be used by machine learning models.
//!
//! # Available Encoders
//!
//! ## OrdinalEncoder
//! Maps each category of a column to an integer code `0..n_categories`.
//!
//! ```text
//! // Input:  sex = ["Male", "Female", "Male"]
//! // Output: sex = [1, 0, 1]
//! ```
//!
//! ## OneHotEncoder
//! Expands each column into one 0/1 indicator column per category.
//!
//! ```text
//! // Input:  race = ["White", "Black"]
//! // Output: race_Black = [0, 1], race_White = [1, 0]
//! ```
//!
//! ## LabelEncoder
//! Encodes a 1D string target to integer class codes.
//!
//! # Design Notes
//!
//! Vocabularies are learned per column and sorted lexicographically by default,
//! so the same training data always produces the same codes. What happens to a
//! category never seen during fit is an explicit [`HandleUnknown`] setting on
//! each encoder.

mod label;
mod one_hot;
mod ordinal;
mod vocabulary;

pub use label::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderConfig, OneHotEncoderParams};
pub use ordinal::{FittedOrdinalEncoder, OrdinalEncoder, OrdinalEncoderConfig, OrdinalEncoderParams};
pub use vocabulary::Vocabulary;

use serde::{Deserialize, Serialize};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Output an all-zero indicator block (one-hot only).
    Ignore,
    /// Output the given code in place of the category (ordinal only).
    UseEncodedValue(i64),
}

/// Order in which a vocabulary assigns codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryOrder {
    /// Lexicographic order of the category strings.
    #[default]
    Sorted,
    /// Order of first appearance in the training data.
    FirstSeen,
}
