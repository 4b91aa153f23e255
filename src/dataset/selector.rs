//! Column selection by name or by kind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::table::{ColumnKind, ColumnSpec, Table};
use crate::preprocessing::error::PreprocessingError;

/// Picks a subset of a table's columns.
///
/// `Names` keeps the requested order; `Kind` and `All` keep table order.
///
/// # Example
/// ```
/// use tabprep::dataset::{Column, ColumnKind, ColumnSelector, Table};
///
/// let table = Table::from_columns(vec![
///     ("age", Column::Numeric(vec![39.0, 50.0])),
///     ("sex", Column::categorical(["Male", "Female"])),
/// ])
/// .unwrap();
///
/// let numeric = ColumnSelector::Kind(ColumnKind::Numeric).select(&table).unwrap();
/// assert_eq!(numeric.column_names(), &["age"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelector {
    Names(Vec<String>),
    Kind(ColumnKind),
    All,
}

impl ColumnSelector {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelector::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn numeric() -> Self {
        ColumnSelector::Kind(ColumnKind::Numeric)
    }

    pub fn categorical() -> Self {
        ColumnSelector::Kind(ColumnKind::Categorical)
    }

    /// Resolve the selector against `table` into concrete column specs.
    pub fn resolve(&self, table: &Table) -> Result<Vec<ColumnSpec>, PreprocessingError> {
        match self {
            ColumnSelector::Names(names) => {
                let mut seen = HashSet::with_capacity(names.len());
                names
                    .iter()
                    .map(|name| {
                        if !seen.insert(name.as_str()) {
                            return Err(PreprocessingError::DuplicateColumn(name.clone()));
                        }
                        let column = table.column(name)?;
                        Ok(ColumnSpec::new(name.clone(), column.kind()))
                    })
                    .collect()
            }
            ColumnSelector::Kind(kind) => Ok(table
                .schema()
                .into_iter()
                .filter(|spec| spec.kind == *kind)
                .collect()),
            ColumnSelector::All => Ok(table.schema()),
        }
    }

    /// Narrower view of `table` holding exactly the selected columns.
    pub fn select(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let names: Vec<String> = self.resolve(table)?.into_iter().map(|s| s.name).collect();
        table.select(&names)
    }
}
