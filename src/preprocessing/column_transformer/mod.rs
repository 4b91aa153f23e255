//! ColumnTransformer for applying different transformers to different columns.
//!
//! This module provides the `ColumnTransformer` which allows applying different
//! preprocessing steps to different subsets of columns in a table.

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    BindingParams, ColumnTransformer, ColumnTransformerParams, ColumnTransformerStep,
    FittedColumnTransformer, FittedColumnTransformerStep, Remainder, StepParams,
};
