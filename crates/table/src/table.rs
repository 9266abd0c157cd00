//! Table, column and cell types.

use serde::{Deserialize, Serialize};

use crate::infer::{infer_column_type, parse_value};
use crate::normalize::normalize_column_name;

/// Column type inferred from the source cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        }
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Error type for table construction.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell {cell:?} in row {row} does not fit column {column} of type {ty}")]
    CellType {
        column: String,
        ty: &'static str,
        row: usize,
        cell: String,
    },
}

/// Rows and named columns held in memory.
///
/// Every row holds exactly one cell per column, in column order. Row order is
/// the order the rows were supplied in.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from already typed rows.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        check_widths(columns.len(), rows.iter().map(Vec::len))?;
        Ok(Self { columns, rows })
    }

    /// Build a table from raw text cells, inferring one type per column.
    ///
    /// # Arguments
    /// * `headers` - Column labels, in source order
    /// * `records` - Raw cells, one `Vec` per row, each as wide as `headers`
    pub fn from_text(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, TableError> {
        check_widths(headers.len(), records.iter().map(Vec::len))?;

        let types: Vec<ColumnType> = (0..headers.len())
            .map(|idx| infer_column_type(records.iter().map(|r| r[idx].as_str())))
            .collect();

        let mut rows = Vec::with_capacity(records.len());
        for (row_idx, record) in records.into_iter().enumerate() {
            let mut row = Vec::with_capacity(record.len());
            for (col_idx, cell) in record.into_iter().enumerate() {
                let ty = types[col_idx];
                let value = parse_value(&cell, ty).ok_or_else(|| TableError::CellType {
                    column: headers[col_idx].clone(),
                    ty: ty.as_str(),
                    row: row_idx,
                    cell: cell.clone(),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        let columns = headers
            .into_iter()
            .zip(types)
            .map(|(name, ty)| Column { name, ty })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Rename every column in place with `rename`.
    pub fn rename_columns<F>(&mut self, mut rename: F)
    where
        F: FnMut(&str) -> String,
    {
        for column in &mut self.columns {
            column.name = rename(&column.name);
        }
    }

    /// Normalize every column label in place.
    ///
    /// Two labels that normalize to the same name are left colliding.
    pub fn normalize_column_names(&mut self) {
        self.rename_columns(normalize_column_name);
    }
}

fn check_widths<I>(expected: usize, widths: I) -> Result<(), TableError>
where
    I: Iterator<Item = usize>,
{
    for (row, found) in widths.enumerate() {
        if found != expected {
            return Err(TableError::RowWidth {
                row,
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_text_infers_types_per_column() {
        let table = Table::from_text(
            strings(&["PassengerId", "Survived", "Name", "Age", "Fare"]),
            vec![
                strings(&["1", "False", "Braund, Mr. Owen Harris", "22", "7.25"]),
                strings(&["2", "True", "Cumings, Mrs. John Bradley", "", "71.2833"]),
            ],
        )
        .unwrap();

        let types: Vec<ColumnType> = table.columns().iter().map(|c| c.ty).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Integer,
                ColumnType::Boolean,
                ColumnType::Text,
                ColumnType::Float,
                ColumnType::Float,
            ]
        );
        assert_eq!(table.rows()[0][3], Value::Float(22.0));
        assert_eq!(table.rows()[1][3], Value::Null);
        assert_eq!(table.rows()[1][1], Value::Boolean(true));
    }

    #[test]
    fn test_from_text_preserves_row_order() {
        let table = Table::from_text(
            strings(&["id"]),
            vec![strings(&["3"]), strings(&["1"]), strings(&["2"])],
        )
        .unwrap();

        let ids: Vec<&Value> = table.rows().iter().map(|r| &r[0]).collect();
        assert_eq!(ids, vec![&Value::Integer(3), &Value::Integer(1), &Value::Integer(2)]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::from_text(strings(&["a", "b"]), vec![strings(&["1"])]).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_normalize_column_names_in_place() {
        let mut table = Table::new(
            vec![
                Column::new(" Passenger Id ", ColumnType::Integer),
                Column::new("Ticket", ColumnType::Text),
            ],
            vec![vec![Value::Integer(1), Value::Text("A/5 21171".into())]],
        )
        .unwrap();

        table.normalize_column_names();

        assert_eq!(table.column_names(), vec!["passenger_id", "ticket"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_colliding_names_are_kept() {
        let mut table = Table::new(
            vec![
                Column::new("Fare", ColumnType::Float),
                Column::new("fare", ColumnType::Float),
            ],
            vec![],
        )
        .unwrap();

        table.normalize_column_names();

        assert_eq!(table.column_names(), vec!["fare", "fare"]);
    }
}
