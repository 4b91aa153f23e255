//! # tabprep
//!
//! Column-wise preprocessing, binary logistic regression and k-fold
//! cross-validation for mixed numeric/categorical tables.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: every transformer and classifier has an
//!   unfitted type holding hyperparameters and a fitted type holding only what
//!   inference needs. Calling `transform` on an unfitted object does not compile.
//! - **Column Dispatch**: a [`ColumnTransformer`](preprocessing::ColumnTransformer)
//!   routes named or kind-selected columns to independent transformers and
//!   concatenates their outputs in binding order.
//! - **No Leakage**: cross-validation builds a fresh pipeline per fold and fits
//!   it on the training rows only.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::Array1;
//! use tabprep::dataset::{Column, ColumnSelector, Table};
//! use tabprep::model::LogisticRegression;
//! use tabprep::model_selection::{cross_val_score, CrossValidator};
//! use tabprep::pipeline::Pipeline;
//! use tabprep::preprocessing::{ColumnTransformer, HandleUnknown, OneHotEncoder, StandardScaler};
//!
//! let hours: Vec<f64> = (0..40).map(|i| 20.0 + i as f64).collect();
//! let job: Vec<&str> = (0..40).map(|i| if i % 2 == 0 { "Sales" } else { "Tech" }).collect();
//! let y: Array1<f64> = hours.iter().map(|&h| if h >= 40.0 { 1.0 } else { 0.0 }).collect();
//! let table = Table::from_columns(vec![
//!     ("hours-per-week", Column::Numeric(hours)),
//!     ("occupation", Column::categorical(job)),
//! ])
//! .unwrap();
//!
//! let build = || {
//!     let preprocessor = ColumnTransformer::new()
//!         .add_standard_scaler("num", StandardScaler::new(), ColumnSelector::numeric())
//!         .add_one_hot_encoder(
//!             "cat",
//!             OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
//!             ColumnSelector::categorical(),
//!         );
//!     Pipeline::new(preprocessor, LogisticRegression::new())
//! };
//! let scores = cross_val_score(build, &table, &y, &CrossValidator::k_fold(5)).unwrap();
//! assert_eq!(scores.len(), 5);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset` — `Table`, column selectors and CSV loading
//! - `preprocessing` — scalers, encoders and the column dispatcher
//! - `model` — classifiers with a fitted/unfitted split
//! - `loss` / `regularizers` — training objective pieces
//! - `pipeline` — preprocessor + classifier estimator
//! - `model_selection` — hold-out split and cross-validation
//! - `config` — JSON workflow description
//! - `serialization` — bincode persistence of fitted parameters

/// In-memory tables, column selection and CSV loading.
pub mod dataset;

/// Data preprocessing transformers for ML pipelines.
pub mod preprocessing;

/// Differentiable loss functions for model training.
pub mod loss;

/// Classifiers with compile-time fit state.
pub mod model;

/// Weight regularization strategies to prevent overfitting.
pub mod regularizers;

/// Model persistence and format conversion utilities.
pub mod serialization;

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{FittedPipeline, Pipeline};
