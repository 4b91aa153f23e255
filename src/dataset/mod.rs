//! Tabular data: typed columns, tables, column selection and CSV loading.

pub mod csv;
pub mod selector;
pub mod table;

pub use self::selector::ColumnSelector;
pub use self::table::{Column, ColumnKind, ColumnSpec, Table};
