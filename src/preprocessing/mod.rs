//! Data preprocessing transformers for tabular pipelines.
//!
//! This module provides column-wise transformers following the same type-state
//! pattern as the classifiers in this library.
//!
//! # Design Philosophy
//!
//! - **Type Safety**: an unfitted transformer only produces a fitted one through `fit`,
//!   so transforming with unlearned parameters cannot be expressed
//! - **Name-based**: fitted transformers find their columns by name, not position
//! - **Serializable**: Fitted transformers can be saved and loaded
//! - **sklearn-compatible**: API familiar to users of scikit-learn
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Scaling
//! - [`IdentityScaler`]: Numeric passthrough
//! - [`StandardScaler`]: Z-score normalization
//!
//! ## Encoding
//! - [`OrdinalEncoder`]: Category to integer code
//! - [`OneHotEncoder`]: Category to indicator columns
//! - [`LabelEncoder`]: String target to class codes
//!
//! ## Composition
//! - [`ColumnTransformer`]: Different transformers for different column subsets
//!
//! # Example
//!
//! ```no_run
//! use tabprep::dataset::{Column, Table};
//! use tabprep::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//!
//! # fn main() -> Result<(), tabprep::preprocessing::PreprocessingError> {
//! # let training_data = Table::from_columns(vec![("age", Column::Numeric(vec![20.0, 40.0]))])?;
//! # let test_data = training_data.clone();
//! let fitted = StandardScaler::new().fit(&training_data)?;
//! let scaled_train = fitted.transform(&training_data)?;
//!
//! // Save for later use
//! fitted.save_to_file("scaler.bin")?;
//!
//! // Later, load and transform new data
//! let loaded = FittedStandardScaler::load_from_file("scaler.bin")?;
//! let scaled_test = loaded.transform(&test_data)?;
//! # Ok(())
//! # }
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnTransformer, ColumnTransformerParams, ColumnTransformerStep, FittedColumnTransformer,
    FittedColumnTransformerStep, Remainder,
};
pub use encoding::{
    CategoryOrder, FittedLabelEncoder, FittedOneHotEncoder, FittedOrdinalEncoder, HandleUnknown,
    LabelEncoder, OneHotEncoder, OneHotEncoderConfig, OrdinalEncoder, OrdinalEncoderConfig,
    Vocabulary,
};
pub use error::PreprocessingError;
pub use scaling::{
    FittedIdentityScaler, FittedStandardScaler, IdentityScaler, StandardScaler,
    StandardScalerConfig,
};
pub use traits::{FittedTransformer, Transformer};
