//! ColumnTransformer implementation.
//!
//! Applies different transformers to different column subsets and concatenates results.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{ColumnSelector, Table};
use crate::preprocessing::encoding::{
    FittedOneHotEncoder, FittedOrdinalEncoder, OneHotEncoder, OneHotEncoderParams, OrdinalEncoder,
    OrdinalEncoderParams,
};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::scaling::{
    FittedIdentityScaler, FittedStandardScaler, IdentityScaler, IdentityScalerParams,
    StandardScaler, StandardScalerParams,
};
use crate::preprocessing::traits::{check_unique_names, FittedTransformer, Transformer};

const REMAINDER: &str = "remainder";

/// What happens to columns no binding claims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remainder {
    /// Leave them out of the output.
    #[default]
    Drop,
    /// Append them unchanged after all binding blocks.
    Passthrough,
}

/// Enum of unfitted transformers that can be used in a ColumnTransformer.
#[derive(Clone, Debug)]
pub enum ColumnTransformerStep {
    IdentityScaler(IdentityScaler),
    StandardScaler(StandardScaler),
    OrdinalEncoder(OrdinalEncoder),
    OneHotEncoder(OneHotEncoder),
}

impl ColumnTransformerStep {
    pub fn step_name(&self) -> &'static str {
        match self {
            ColumnTransformerStep::IdentityScaler(_) => "IdentityScaler",
            ColumnTransformerStep::StandardScaler(_) => "StandardScaler",
            ColumnTransformerStep::OrdinalEncoder(_) => "OrdinalEncoder",
            ColumnTransformerStep::OneHotEncoder(_) => "OneHotEncoder",
        }
    }

    fn fit(&self, data: &Table) -> Result<FittedColumnTransformerStep, PreprocessingError> {
        match self {
            ColumnTransformerStep::IdentityScaler(t) => {
                t.fit(data).map(FittedColumnTransformerStep::IdentityScaler)
            }
            ColumnTransformerStep::StandardScaler(t) => {
                t.fit(data).map(FittedColumnTransformerStep::StandardScaler)
            }
            ColumnTransformerStep::OrdinalEncoder(t) => {
                t.fit(data).map(FittedColumnTransformerStep::OrdinalEncoder)
            }
            ColumnTransformerStep::OneHotEncoder(t) => {
                t.fit(data).map(FittedColumnTransformerStep::OneHotEncoder)
            }
        }
    }
}

impl From<IdentityScaler> for ColumnTransformerStep {
    fn from(t: IdentityScaler) -> Self {
        ColumnTransformerStep::IdentityScaler(t)
    }
}

impl From<StandardScaler> for ColumnTransformerStep {
    fn from(t: StandardScaler) -> Self {
        ColumnTransformerStep::StandardScaler(t)
    }
}

impl From<OrdinalEncoder> for ColumnTransformerStep {
    fn from(t: OrdinalEncoder) -> Self {
        ColumnTransformerStep::OrdinalEncoder(t)
    }
}

impl From<OneHotEncoder> for ColumnTransformerStep {
    fn from(t: OneHotEncoder) -> Self {
        ColumnTransformerStep::OneHotEncoder(t)
    }
}

/// Enum of fitted transformers for ColumnTransformer.
#[derive(Clone, Debug)]
pub enum FittedColumnTransformerStep {
    IdentityScaler(FittedIdentityScaler),
    StandardScaler(FittedStandardScaler),
    OrdinalEncoder(FittedOrdinalEncoder),
    OneHotEncoder(FittedOneHotEncoder),
}

impl FittedColumnTransformerStep {
    pub fn step_name(&self) -> &'static str {
        match self {
            FittedColumnTransformerStep::IdentityScaler(_) => "IdentityScaler",
            FittedColumnTransformerStep::StandardScaler(_) => "StandardScaler",
            FittedColumnTransformerStep::OrdinalEncoder(_) => "OrdinalEncoder",
            FittedColumnTransformerStep::OneHotEncoder(_) => "OneHotEncoder",
        }
    }

    pub fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        match self {
            FittedColumnTransformerStep::IdentityScaler(t) => t.transform(data),
            FittedColumnTransformerStep::StandardScaler(t) => t.transform(data),
            FittedColumnTransformerStep::OrdinalEncoder(t) => t.transform(data),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.transform(data),
        }
    }

    pub fn feature_names_in(&self) -> &[String] {
        match self {
            FittedColumnTransformerStep::IdentityScaler(t) => t.feature_names_in(),
            FittedColumnTransformerStep::StandardScaler(t) => t.feature_names_in(),
            FittedColumnTransformerStep::OrdinalEncoder(t) => t.feature_names_in(),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.feature_names_in(),
        }
    }

    pub fn feature_names_out(&self) -> Vec<String> {
        match self {
            FittedColumnTransformerStep::IdentityScaler(t) => t.feature_names_out(),
            FittedColumnTransformerStep::StandardScaler(t) => t.feature_names_out(),
            FittedColumnTransformerStep::OrdinalEncoder(t) => t.feature_names_out(),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.feature_names_out(),
        }
    }

    pub fn n_features_out(&self) -> usize {
        match self {
            FittedColumnTransformerStep::IdentityScaler(t) => t.n_features_out(),
            FittedColumnTransformerStep::StandardScaler(t) => t.n_features_out(),
            FittedColumnTransformerStep::OrdinalEncoder(t) => t.n_features_out(),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.n_features_out(),
        }
    }

    fn extract_params(&self) -> StepParams {
        match self {
            FittedColumnTransformerStep::IdentityScaler(t) => {
                StepParams::IdentityScaler(t.extract_params())
            }
            FittedColumnTransformerStep::StandardScaler(t) => {
                StepParams::StandardScaler(t.extract_params())
            }
            FittedColumnTransformerStep::OrdinalEncoder(t) => {
                StepParams::OrdinalEncoder(t.extract_params())
            }
            FittedColumnTransformerStep::OneHotEncoder(t) => {
                StepParams::OneHotEncoder(t.extract_params())
            }
        }
    }

    fn from_params(params: StepParams) -> Result<Self, PreprocessingError> {
        Ok(match params {
            StepParams::IdentityScaler(p) => {
                FittedColumnTransformerStep::IdentityScaler(FittedIdentityScaler::from_params(p)?)
            }
            StepParams::StandardScaler(p) => {
                FittedColumnTransformerStep::StandardScaler(FittedStandardScaler::from_params(p)?)
            }
            StepParams::OrdinalEncoder(p) => {
                FittedColumnTransformerStep::OrdinalEncoder(FittedOrdinalEncoder::from_params(p)?)
            }
            StepParams::OneHotEncoder(p) => {
                FittedColumnTransformerStep::OneHotEncoder(FittedOneHotEncoder::from_params(p)?)
            }
        })
    }
}

#[derive(Clone, Debug)]
struct Binding {
    name: String,
    selector: ColumnSelector,
    step: ColumnTransformerStep,
}

/// Applies a transformer to each selected column subset and concatenates
/// the results left to right, in the order the bindings were added.
///
/// Every binding has a unique name; its output columns are prefixed with
/// `"{name}__"`. A column may belong to at most one binding.
///
/// # Example
/// ```
/// use tabprep::dataset::{Column, ColumnSelector, Table};
/// use tabprep::preprocessing::{
///     ColumnTransformer, FittedTransformer, HandleUnknown, OneHotEncoder, OrdinalEncoder,
///     StandardScaler, Transformer,
/// };
///
/// let data = Table::from_columns(vec![
///     ("age", Column::Numeric(vec![25.0, 38.0, 28.0])),
///     ("sex", Column::categorical(["Male", "Female", "Male"])),
///     ("race", Column::categorical(["White", "Black", "White"])),
/// ])
/// .unwrap();
///
/// let preprocessor = ColumnTransformer::new()
///     .add_ordinal_encoder("binary-encoder", OrdinalEncoder::new(), ColumnSelector::names(["sex"]))
///     .add_one_hot_encoder(
///         "one-hot-encoder",
///         OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
///         ColumnSelector::names(["race"]),
///     )
///     .add_standard_scaler("standard-scaler", StandardScaler::new(), ColumnSelector::numeric());
///
/// let fitted = preprocessor.fit(&data).unwrap();
/// let features = fitted.transform(&data).unwrap();
/// assert_eq!(features.n_columns(), 4);
/// assert_eq!(features.column_names()[0], "binary-encoder__sex");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColumnTransformer {
    bindings: Vec<Binding>,
    remainder: Remainder,
}

impl ColumnTransformer {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `step` to the columns chosen by `selector`.
    pub fn add(
        mut self,
        name: impl Into<String>,
        step: impl Into<ColumnTransformerStep>,
        selector: ColumnSelector,
    ) -> Self {
        self.bindings.push(Binding {
            name: name.into(),
            selector,
            step: step.into(),
        });
        self
    }

    pub fn add_identity_scaler(self, name: impl Into<String>, selector: ColumnSelector) -> Self {
        self.add(name, IdentityScaler::new(), selector)
    }

    /// Add a StandardScaler for the selected columns.
    pub fn add_standard_scaler(
        self,
        name: impl Into<String>,
        scaler: StandardScaler,
        selector: ColumnSelector,
    ) -> Self {
        self.add(name, scaler, selector)
    }

    /// Add an OrdinalEncoder for the selected columns.
    pub fn add_ordinal_encoder(
        self,
        name: impl Into<String>,
        encoder: OrdinalEncoder,
        selector: ColumnSelector,
    ) -> Self {
        self.add(name, encoder, selector)
    }

    /// Add a OneHotEncoder for the selected columns.
    pub fn add_one_hot_encoder(
        self,
        name: impl Into<String>,
        encoder: OneHotEncoder,
        selector: ColumnSelector,
    ) -> Self {
        self.add(name, encoder, selector)
    }

    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn binding_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }
}

fn check_binding_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), PreprocessingError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() || name == REMAINDER {
            return Err(PreprocessingError::InvalidParameter(format!(
                "'{}' is not a valid binding name",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate binding name '{}'",
                name
            )));
        }
    }
    Ok(())
}

/// Map every claimed column to its owning binding, rejecting columns claimed twice.
fn claim_columns<'a>(
    claims: impl IntoIterator<Item = (&'a str, &'a [String])>,
) -> Result<HashMap<&'a str, &'a str>, PreprocessingError> {
    let mut owners = HashMap::new();
    for (owner, columns) in claims {
        for column in columns {
            if let Some(first) = owners.insert(column.as_str(), owner) {
                return Err(PreprocessingError::OverlappingColumns {
                    column: column.clone(),
                    first: first.to_string(),
                    second: owner.to_string(),
                });
            }
        }
    }
    Ok(owners)
}

/// Serializable parameters of one fitted step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepParams {
    IdentityScaler(IdentityScalerParams),
    StandardScaler(StandardScalerParams),
    OrdinalEncoder(OrdinalEncoderParams),
    OneHotEncoder(OneHotEncoderParams),
}

/// Serializable parameters of one fitted binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingParams {
    pub name: String,
    pub columns: Vec<String>,
    pub step: StepParams,
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    pub bindings: Vec<BindingParams>,
    /// Columns passed through unchanged, empty when the remainder is dropped.
    pub remainder: Vec<String>,
}

#[derive(Clone, Debug)]
struct FittedBinding {
    name: String,
    columns: Vec<String>,
    step: FittedColumnTransformerStep,
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    bindings: Vec<FittedBinding>,
    remainder: Vec<String>,
    feature_names_in: Vec<String>,
}

impl FittedColumnTransformer {
    fn new(bindings: Vec<FittedBinding>, remainder: Vec<String>) -> Self {
        let feature_names_in = bindings
            .iter()
            .flat_map(|b| b.columns.iter().cloned())
            .chain(remainder.iter().cloned())
            .collect();
        Self {
            bindings,
            remainder,
            feature_names_in,
        }
    }

    /// Get binding names with the step type and the columns each one owns.
    pub fn bindings(&self) -> Vec<(&str, &'static str, &[String])> {
        self.bindings
            .iter()
            .map(|b| (b.name.as_str(), b.step.step_name(), b.columns.as_slice()))
            .collect()
    }

    /// Fitted step of the binding called `name`.
    pub fn step(&self, name: &str) -> Option<&FittedColumnTransformerStep> {
        self.bindings.iter().find(|b| b.name == name).map(|b| &b.step)
    }

    /// Columns passed through unchanged.
    pub fn remainder_columns(&self) -> &[String] {
        &self.remainder
    }

    fn require_columns(
        data: &Table,
        binding: &str,
        columns: &[String],
    ) -> Result<(), PreprocessingError> {
        match columns.iter().find(|c| !data.contains(c)) {
            Some(missing) => Err(PreprocessingError::MissingColumn {
                binding: binding.to_string(),
                column: missing.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Transformer for ColumnTransformer {
    type Params = ColumnTransformerParams;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }
        if self.bindings.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }
        check_binding_names(self.bindings.iter().map(|b| b.name.as_str()))?;

        let mut resolved = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let columns: Vec<String> = binding
                .selector
                .resolve(data)?
                .into_iter()
                .map(|spec| spec.name)
                .collect();
            resolved.push(columns);
        }

        let remainder: Vec<String> = {
            let owners = claim_columns(
                self.bindings
                    .iter()
                    .map(|b| b.name.as_str())
                    .zip(resolved.iter().map(Vec::as_slice)),
            )?;
            match self.remainder {
                Remainder::Drop => Vec::new(),
                Remainder::Passthrough => data
                    .column_names()
                    .iter()
                    .filter(|c| !owners.contains_key(c.as_str()))
                    .cloned()
                    .collect(),
            }
        };

        let mut fitted = Vec::with_capacity(self.bindings.len());
        for (binding, columns) in self.bindings.iter().zip(resolved) {
            let subset = data.select(&columns)?;
            let step = binding.step.fit(&subset)?;
            debug!(
                binding = %binding.name,
                step = step.step_name(),
                columns = columns.len(),
                features_out = step.n_features_out(),
                "fitted binding"
            );
            fitted.push(FittedBinding {
                name: binding.name.clone(),
                columns,
                step,
            });
        }

        let fitted = FittedColumnTransformer::new(fitted, remainder);
        // Bindings "a" -> "b__c" and "a__b" -> "c" both produce "a__b__c".
        check_unique_names(&fitted.feature_names_out())?;
        Ok(fitted)
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &Table) -> Result<Table, PreprocessingError> {
        let mut blocks = Vec::with_capacity(self.bindings.len() + 1);

        for binding in &self.bindings {
            Self::require_columns(data, &binding.name, &binding.columns)?;
            let subset = data.select(&binding.columns)?;
            let block = binding.step.transform(&subset)?;
            blocks.push(block.rename(|f| format!("{}__{}", binding.name, f))?);
        }

        if !self.remainder.is_empty() {
            Self::require_columns(data, REMAINDER, &self.remainder)?;
            let passthrough = data.select(&self.remainder)?;
            blocks.push(passthrough.rename(|f| format!("{}__{}", REMAINDER, f))?);
        }

        if blocks.is_empty() {
            return Ok(Table::empty(data.n_rows()));
        }
        Table::hconcat(&blocks)
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            bindings: self
                .bindings
                .iter()
                .map(|b| BindingParams {
                    name: b.name.clone(),
                    columns: b.columns.clone(),
                    step: b.step.extract_params(),
                })
                .collect(),
            remainder: self.remainder.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        check_binding_names(params.bindings.iter().map(|b| b.name.as_str()))?;
        claim_columns(
            params
                .bindings
                .iter()
                .map(|b| (b.name.as_str(), b.columns.as_slice()))
                .chain(std::iter::once((REMAINDER, params.remainder.as_slice()))),
        )?;

        let mut bindings = Vec::with_capacity(params.bindings.len());
        for p in params.bindings {
            let step = FittedColumnTransformerStep::from_params(p.step)?;
            if step.feature_names_in() != p.columns.as_slice() {
                return Err(PreprocessingError::FeatureMismatch {
                    expected_features: p.columns.len(),
                    got_features: step.feature_names_in().len(),
                });
            }
            bindings.push(FittedBinding {
                name: p.name,
                columns: p.columns,
                step,
            });
        }
        let fitted = Self::new(bindings, params.remainder);
        check_unique_names(&fitted.feature_names_out())?;
        Ok(fitted)
    }

    fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.bindings
            .iter()
            .flat_map(|b| {
                b.step
                    .feature_names_out()
                    .into_iter()
                    .map(move |f| format!("{}__{}", b.name, f))
            })
            .chain(self.remainder.iter().map(|c| format!("{}__{}", REMAINDER, c)))
            .collect()
    }

    fn n_features_out(&self) -> usize {
        self.bindings
            .iter()
            .map(|b| b.step.n_features_out())
            .sum::<usize>()
            + self.remainder.len()
    }
}
