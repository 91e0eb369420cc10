//! FILENAME: core/datatable/src/table.rs
//! PURPOSE: An immutable, column-oriented in-memory table.
//! CONTEXT: The aggregation engine reads detail rows from a `Table` and can
//! hand its report back as a `Table`, so that one run's output feeds the next.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

// ============================================================================
// COLUMN
// ============================================================================

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// A set of equally long, uniquely named columns.
/// Once built the table is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table from columns. All columns must have the same length
    /// and distinct names.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);

        for (i, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(TableError::RaggedColumn {
                    column: column.name.clone(),
                    expected: row_count,
                    found: column.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Table { columns, row_count })
    }

    /// Builds a table from a header and row-major data.
    pub fn from_rows<S: Into<String>>(
        headers: Vec<S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, TableError> {
        let names: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut data: Vec<Vec<Value>> = names
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(TableError::RaggedRow {
                    row: row_idx,
                    expected: names.len(),
                    found: row.len(),
                });
            }
            for (col_idx, value) in row.into_iter().enumerate() {
                data[col_idx].push(value);
            }
        }

        let columns = names
            .into_iter()
            .zip(data)
            .map(|(name, values)| Column::new(name, values))
            .collect();

        Table::new(columns)
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Table {
            columns: Vec::new(),
            row_count: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the value at (row, column name), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.get(row))
    }

    /// Materializes one row in column order.
    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[row].clone()).collect())
    }
}

impl TryFrom<Vec<Column>> for Table {
    type Error = TableError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Table::new(columns)
    }
}

impl From<Table> for Vec<Column> {
    fn from(table: Table) -> Self {
        table.columns
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::empty()
    }
}
