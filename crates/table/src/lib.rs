//! In-memory tabular model for tabload.
//!
//! Holds the parsed source dataset, infers a column type per column and
//! normalizes column labels before the table is written to the database.

pub mod infer;
pub mod normalize;
pub mod table;

pub use normalize::normalize_column_name;
pub use table::{Column, ColumnType, Table, TableError, Value};
