//! Adult census preprocessing walkthrough.
//!
//! Compares a numeric-only logistic regression with and without scaling, then
//! cross-validates encoders for the categorical columns and finally the full
//! column transformer.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use ndarray::Array1;
use tabprep::config::WorkflowConfig;
use tabprep::dataset::csv::{read_csv, CsvOptions};
use tabprep::dataset::{ColumnSelector, Table};
use tabprep::model::{FittedClassifier, LogisticRegression};
use tabprep::model_selection::{
    cross_validate, train_test_split, CrossValidator, CvScores, TrainTestSplit,
};
use tabprep::pipeline::Pipeline;
use tabprep::preprocessing::{
    ColumnTransformer, FittedTransformer, HandleUnknown, OneHotEncoder, OrdinalEncoder,
    StandardScaler, Transformer,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "census_workflow", about = "Preprocessing and cross-validation on adult census data")]
struct Cli {
    /// CSV file; overrides the path in the config.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Workflow config (JSON). Defaults to the built-in adult census setup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of cross-validation folds.
    #[arg(long)]
    folds: Option<usize>,

    /// Seed for the train/test split and shuffled folds.
    #[arg(long)]
    seed: Option<u64>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Save the final fitted pipeline to this file.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tabprep::logging::init(&format!("tabprep={0},census_workflow={0}", cli.log_level))?;

    let mut config = match &cli.config {
        Some(path) => WorkflowConfig::from_file(path)?,
        None => WorkflowConfig::adult_census(),
    };
    if let Some(folds) = cli.folds {
        config.cross_validation.n_splits = folds;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
        config.cross_validation.seed = seed;
    }
    config.validate()?;

    let path = cli
        .data
        .clone()
        .or_else(|| config.data.path.clone())
        .context("no data file given; pass --data or set data.path in the config")?;
    let raw = read_csv(&path, &CsvOptions::default())
        .with_context(|| format!("failed to load {}", path.display()))?;
    let (data, target) = config.prepare(&raw)?;
    println!(
        "The dataset contains {} samples and {} features",
        data.n_rows(),
        data.n_columns()
    );

    let cv = config.build_cross_validator();
    let classifier = config.build_classifier();

    // Numerical features only.
    let numeric = ColumnSelector::numeric().select(&data)?;
    let split = train_test_split(&numeric, &target, config.test_size, config.seed)?;
    println!(
        "Train on {} rows, test on {} rows",
        split.x_train.n_rows(),
        split.x_test.n_rows()
    );

    // Default max_iter: on raw scales the solver stops before converging.
    let plain = ColumnTransformer::new().add_identity_scaler("numeric", ColumnSelector::All);
    holdout_run("no scaling", plain, &LogisticRegression::new(), &split)?;

    let scaled = ColumnTransformer::new().add_standard_scaler(
        "numeric",
        StandardScaler::new(),
        ColumnSelector::All,
    );
    holdout_run("standard scaling", scaled.clone(), &classifier, &split)?;

    let scores = run_cv(
        || Pipeline::new(scaled.clone(), classifier.clone()),
        &numeric,
        &target,
        &cv,
    )?;
    report("scaled numeric features", &scores);

    // Categorical features only.
    let categorical = ColumnSelector::categorical().select(&data)?;
    let ordinal = OrdinalEncoder::new().fit_transform(&categorical)?;
    println!(
        "OrdinalEncoder: {} columns -> {} features",
        categorical.n_columns(),
        ordinal.n_columns()
    );
    let one_hot = OneHotEncoder::new().fit(&categorical)?;
    println!(
        "OneHotEncoder: {} columns -> {} features",
        categorical.n_columns(),
        one_hot.n_features_out()
    );

    let encoded = ColumnTransformer::new().add_one_hot_encoder(
        "one-hot-encoder",
        OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
        ColumnSelector::All,
    );
    let scores = run_cv(
        || Pipeline::new(encoded.clone(), classifier.clone()),
        &categorical,
        &target,
        &cv,
    )?;
    report("one-hot categorical features", &scores);

    // Everything, dispatched per column.
    let scores = run_cv(|| config.build_pipeline(), &data, &target, &cv)?;
    report("column transformer", &scores);
    println!("The different scores obtained are: {:?}", scores.scores());

    if let Some(save) = &cli.save {
        let mut model = config.build_pipeline();
        model.fit(&data, &target)?;
        model.into_fitted()?.save_to_file(save)?;
        info!(path = %save.display(), "saved fitted pipeline");
    }

    Ok(())
}

fn holdout_run(
    label: &str,
    preprocessor: ColumnTransformer,
    classifier: &LogisticRegression,
    split: &TrainTestSplit,
) -> anyhow::Result<()> {
    let mut model = Pipeline::new(preprocessor, classifier.clone());
    let start = Instant::now();
    model.fit(&split.x_train, &split.y_train)?;
    let elapsed = start.elapsed();
    let accuracy = model.score(&split.x_test, &split.y_test)?;
    let fitted = model.into_fitted()?;
    let lr = fitted.model();
    println!(
        "[{}] fit in {:.3}s, {} iterations (converged: {}), accuracy {:.3}, {} features",
        label,
        elapsed.as_secs_f64(),
        lr.n_iter(),
        lr.converged(),
        accuracy,
        lr.n_features_in()
    );
    Ok(())
}

fn run_cv<F>(
    factory: F,
    data: &Table,
    target: &Array1<f64>,
    cv: &CrossValidator,
) -> anyhow::Result<CvScores>
where
    F: Fn() -> Pipeline<LogisticRegression> + Sync,
{
    let start = Instant::now();
    let reports = cross_validate(factory, data, target, cv)?;
    info!(
        folds = reports.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "cross-validation finished"
    );
    Ok(CvScores::from(reports.as_slice()))
}

fn report(label: &str, scores: &CvScores) {
    println!(
        "[{}] accuracy {:.3} +- {:.3}",
        label,
        scores.mean(),
        scores.std()
    );
}
