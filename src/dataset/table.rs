//! Heterogeneous, column-oriented table.
//!
//! A [`Table`] is an ordered list of uniquely named columns of equal length.
//! Columns are reference counted, so selecting or reordering columns builds a
//! new table that shares storage with the original.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::preprocessing::error::PreprocessingError;

/// Semantic kind of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Declared name and kind of a column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Numeric)
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Categorical)
    }
}

/// Column storage.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    /// Build a categorical column from anything string-like.
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Categorical(values.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            Column::Categorical(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }

    /// Gather rows by index. Indices must be in bounds.
    fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(rows.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(values)
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::Categorical(values)
    }
}

/// Ordered collection of named, equally long columns.
#[derive(Clone, Debug, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Arc<Column>>,
    n_rows: usize,
}

impl Table {
    /// A table with no columns and `n_rows` rows.
    pub fn empty(n_rows: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            n_rows,
        }
    }

    /// Build a table from `(name, column)` pairs.
    ///
    /// The row count is taken from the first column. Fails on duplicate names
    /// or columns of differing length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, PreprocessingError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut iter = columns.into_iter().peekable();
        let n_rows = iter.peek().map(|(_, c)| c.len()).unwrap_or(0);
        let mut table = Self::empty(n_rows);
        for (name, column) in iter {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Append a column, checking name uniqueness and length.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PreprocessingError> {
        self.push_shared(name.into(), Arc::new(column))
    }

    /// Builder form of [`push_column`](Self::push_column).
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Self, PreprocessingError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    fn push_shared(&mut self, name: String, column: Arc<Column>) -> Result<(), PreprocessingError> {
        if self.names.contains(&name) {
            return Err(PreprocessingError::DuplicateColumn(name));
        }
        if self.columns.is_empty() && self.names.is_empty() && self.n_rows == 0 {
            self.n_rows = column.len();
        }
        if column.len() != self.n_rows {
            return Err(PreprocessingError::LengthMismatch {
                column: name,
                expected: self.n_rows,
                got: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Ordered name/kind pairs of every column.
    pub fn schema(&self) -> Vec<ColumnSpec> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| ColumnSpec::new(name.clone(), col.kind()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| self.columns[i].as_ref())
    }

    pub fn column(&self, name: &str) -> Result<&Column, PreprocessingError> {
        self.get(name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))
    }

    /// Numeric values of `name`, or `TypeMismatch` for a categorical column.
    pub fn numeric_column(&self, name: &str) -> Result<&[f64], PreprocessingError> {
        let column = self.column(name)?;
        column
            .as_numeric()
            .ok_or_else(|| PreprocessingError::TypeMismatch {
                column: name.to_string(),
                expected: ColumnKind::Numeric,
                got: column.kind(),
            })
    }

    /// Categorical values of `name`, or `TypeMismatch` for a numeric column.
    pub fn categorical_column(&self, name: &str) -> Result<&[String], PreprocessingError> {
        let column = self.column(name)?;
        column
            .as_categorical()
            .ok_or_else(|| PreprocessingError::TypeMismatch {
                column: name.to_string(),
                expected: ColumnKind::Categorical,
                got: column.kind(),
            })
    }

    /// Iterate over `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.as_str(), c.as_ref()))
    }

    /// New table with exactly `names`, in that order. Column data is shared.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, PreprocessingError> {
        let mut out = Table::empty(self.n_rows);
        for name in names {
            let name = name.as_ref();
            let idx = self
                .position(name)
                .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))?;
            out.push_shared(name.to_string(), Arc::clone(&self.columns[idx]))?;
        }
        Ok(out)
    }

    /// New table without `names`. Every name must exist.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, PreprocessingError> {
        let mut dropped = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) {
                return Err(PreprocessingError::ColumnNotFound(name.to_string()));
            }
            dropped.insert(name);
        }
        let kept: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| !dropped.contains(n))
            .collect();
        self.select(&kept)
    }

    /// New table holding the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Result<Table, PreprocessingError> {
        if let Some(&bad) = rows.iter().find(|&&i| i >= self.n_rows) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "row index {} out of bounds for table with {} rows",
                bad, self.n_rows
            )));
        }
        Ok(Table {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Arc::new(c.take(rows)))
                .collect(),
            n_rows: rows.len(),
        })
    }

    /// Concatenate tables left to right. All blocks must have the same row
    /// count and disjoint column names.
    pub fn hconcat(blocks: &[Table]) -> Result<Table, PreprocessingError> {
        let first = blocks.first().ok_or_else(|| {
            PreprocessingError::InvalidParameter("cannot concatenate zero tables".to_string())
        })?;
        let mut out = Table::empty(first.n_rows);
        for block in blocks {
            if block.n_rows != out.n_rows {
                return Err(PreprocessingError::LengthMismatch {
                    column: block.names.first().cloned().unwrap_or_default(),
                    expected: out.n_rows,
                    got: block.n_rows,
                });
            }
            for (name, col) in block.names.iter().zip(&block.columns) {
                out.push_shared(name.clone(), Arc::clone(col))?;
            }
        }
        Ok(out)
    }

    /// Copy of this table with every column renamed by `f`.
    pub fn rename<F>(&self, f: F) -> Result<Table, PreprocessingError>
    where
        F: Fn(&str) -> String,
    {
        let mut out = Table::empty(self.n_rows);
        for (name, col) in self.names.iter().zip(&self.columns) {
            out.push_shared(f(name), Arc::clone(col))?;
        }
        Ok(out)
    }

    /// Dense row-major matrix of an all-numeric table.
    pub fn to_array(&self) -> Result<Array2<f64>, PreprocessingError> {
        let mut numeric = Vec::with_capacity(self.columns.len());
        for (name, col) in self.names.iter().zip(&self.columns) {
            let values = col
                .as_numeric()
                .ok_or_else(|| PreprocessingError::TypeMismatch {
                    column: name.clone(),
                    expected: ColumnKind::Numeric,
                    got: col.kind(),
                })?;
            numeric.push(values);
        }
        Ok(Array2::from_shape_fn(
            (self.n_rows, numeric.len()),
            |(i, j)| numeric[j][i],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("age", Column::Numeric(vec![25.0, 38.0, 28.0])),
            ("sex", Column::categorical(["Male", "Female", "Male"])),
            ("hours-per-week", Column::Numeric(vec![40.0, 50.0, 40.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_shape_and_schema() {
        let table = sample();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 3);
        assert_eq!(
            table.schema(),
            vec![
                ColumnSpec::numeric("age"),
                ColumnSpec::categorical("sex"),
                ColumnSpec::numeric("hours-per-week"),
            ]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Table::from_columns(vec![
            ("a", Column::Numeric(vec![1.0])),
            ("a", Column::Numeric(vec![2.0])),
        ]);
        assert_eq!(
            result.unwrap_err(),
            PreprocessingError::DuplicateColumn("a".to_string())
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Table::from_columns(vec![
            ("a", Column::Numeric(vec![1.0, 2.0])),
            ("b", Column::Numeric(vec![2.0])),
        ]);
        assert!(matches!(
            result,
            Err(PreprocessingError::LengthMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_select_shares_storage() {
        let table = sample();
        let view = table.select(&["hours-per-week", "age"]).unwrap();
        assert_eq!(view.column_names(), &["hours-per-week", "age"]);
        assert!(Arc::ptr_eq(&table.columns[0], &view.columns[1]));
    }

    #[test]
    fn test_select_missing_column() {
        let table = sample();
        let err = table.select(&["fnlwgt"]).unwrap_err();
        assert_eq!(err, PreprocessingError::ColumnNotFound("fnlwgt".to_string()));
    }

    #[test]
    fn test_drop_columns() {
        let table = sample();
        let dropped = table.drop_columns(&["sex"]).unwrap();
        assert_eq!(dropped.column_names(), &["age", "hours-per-week"]);
        assert!(table.drop_columns(&["nope"]).is_err());
    }

    #[test]
    fn test_take_rows() {
        let table = sample();
        let subset = table.take_rows(&[2, 0]).unwrap();
        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.numeric_column("age").unwrap(), &[28.0, 25.0]);
        assert_eq!(subset.categorical_column("sex").unwrap(), &["Male", "Male"]);
        assert!(table.take_rows(&[3]).is_err());
    }

    #[test]
    fn test_hconcat() {
        let table = sample();
        let left = table.select(&["age"]).unwrap();
        let right = table.select(&["sex"]).unwrap();
        let joined = Table::hconcat(&[left.clone(), right]).unwrap();
        assert_eq!(joined.column_names(), &["age", "sex"]);

        let err = Table::hconcat(&[left.clone(), left]).unwrap_err();
        assert_eq!(err, PreprocessingError::DuplicateColumn("age".to_string()));
    }

    #[test]
    fn test_to_array() {
        let table = sample().select(&["age", "hours-per-week"]).unwrap();
        let array = table.to_array().unwrap();
        assert_eq!(array.shape(), &[3, 2]);
        assert_eq!(array[[1, 0]], 38.0);
        assert_eq!(array[[1, 1]], 50.0);
    }

    #[test]
    fn test_to_array_rejects_categorical() {
        let err = sample().to_array().unwrap_err();
        assert!(matches!(err, PreprocessingError::TypeMismatch { .. }));
    }

    #[test]
    fn test_empty_table_keeps_row_count() {
        let table = Table::empty(4);
        assert_eq!(table.n_rows(), 4);
        let with = table.with_column("x", Column::Numeric(vec![0.0; 4])).unwrap();
        assert_eq!(with.n_columns(), 1);
    }
}
