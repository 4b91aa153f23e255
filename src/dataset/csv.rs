//! CSV loading into a [`Table`].
//!
//! Headers become column names and every field is trimmed. Column kinds come
//! from a declared schema when one is given; otherwise a column is numeric
//! when every one of its values parses as `f64`, and categorical otherwise.
//!
//! # Example
//! ```no_run
//! use tabprep::dataset::csv::{read_csv, CsvOptions};
//!
//! let table = read_csv("datasets/adult-census.csv", &CsvOptions::default()).unwrap();
//! println!("{} rows, {} columns", table.n_rows(), table.n_columns());
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ::csv::ReaderBuilder;
use tracing::debug;

use crate::dataset::table::{Column, ColumnKind, ColumnSpec, Table};
use crate::preprocessing::error::PreprocessingError;

/// Options for [`read_csv`].
#[derive(Clone, Debug)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Declared kinds for some or all columns. Undeclared columns are inferred.
    pub schema: Vec<ColumnSpec>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            schema: Vec::new(),
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_schema(mut self, schema: Vec<ColumnSpec>) -> Self {
        self.schema = schema;
        self
    }

    fn declared_kind(&self, name: &str) -> Option<ColumnKind> {
        self.schema.iter().find(|s| s.name == name).map(|s| s.kind)
    }
}

/// Read a CSV file with a header row into a table.
pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Table, PreprocessingError> {
    let file = File::open(path.as_ref())?;
    let table = read_csv_from_reader(BufReader::new(file), options)?;
    debug!(
        path = %path.as_ref().display(),
        rows = table.n_rows(),
        columns = table.n_columns(),
        "loaded csv"
    );
    Ok(table)
}

/// Read CSV data with a header row from any reader.
pub fn read_csv_from_reader<R: Read>(
    reader: R,
    options: &CsvOptions,
) -> Result<Table, PreprocessingError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if let Some(spec) = options.schema.iter().find(|s| !headers.contains(&s.name)) {
        return Err(PreprocessingError::ColumnNotFound(spec.name.clone()));
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(PreprocessingError::Parse(format!(
                "record {} has {} fields, expected {}",
                line + 1,
                record.len(),
                headers.len()
            )));
        }
        for (values, field) in raw.iter_mut().zip(record.iter()) {
            values.push(field.trim().to_string());
        }
    }

    let mut table = Table::empty(raw.first().map_or(0, Vec::len));
    for (name, values) in headers.into_iter().zip(raw) {
        let column = match options.declared_kind(&name) {
            Some(ColumnKind::Numeric) => Column::Numeric(parse_numeric(&name, &values)?),
            Some(ColumnKind::Categorical) => Column::Categorical(values),
            None => infer_column(values),
        };
        table.push_column(name, column)?;
    }
    Ok(table)
}

fn parse_numeric(name: &str, values: &[String]) -> Result<Vec<f64>, PreprocessingError> {
    values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.parse::<f64>().map_err(|_| {
                PreprocessingError::Parse(format!(
                    "column '{}' row {}: '{}' is not a number",
                    name, row, v
                ))
            })
        })
        .collect()
}

fn infer_column(values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
    match parsed {
        Some(numbers) if !values.is_empty() => Column::Numeric(numbers),
        _ => Column::Categorical(values),
    }
}
