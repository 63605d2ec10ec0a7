use serde::{Deserialize, Serialize};

use crate::errors::Warning;

/// A single value in a response table.
///
/// The upstream API reports every field as a JSON string; numeric
/// coercion during aggregation rewrites value cells to [`Cell::Num`].
/// Serializes as a plain JSON scalar (`Empty` becomes `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Num(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Text content, if this cell is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this cell has been coerced.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view used by coercion: unparsable text and empty cells
    /// become zero.
    pub(crate) fn to_num_or_zero(&self) -> f64 {
        match self {
            Cell::Num(n) => *n,
            Cell::Text(s) => s.trim().parse().unwrap_or(0.0),
            Cell::Empty => 0.0,
        }
    }

    /// Canonical string form used as a grouping key.
    pub(crate) fn key(&self) -> String {
        match self {
            Cell::Num(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&serde_json::Value> for Cell {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            serde_json::Value::Number(n) => Cell::Num(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::Null => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

/// An ordered, rectangular table of named columns.
///
/// Produced by decoding the upstream array-of-arrays payload; aggregation
/// reshapes it in place. Row cells are positional, with `columns` defining
/// the field order. A table with a header but no rows is a legitimate
/// empty result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table with the given field names and no rows.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Field names, in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, each in column order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows. It may still carry field names.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under the named column, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let i = self.column_index(column)?;
        self.rows.get(row)?.get(i)
    }

    pub(crate) fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Cell>> {
        &mut self.rows
    }

    /// Appends a column; `cells` must hold one value per row.
    pub(crate) fn push_column(&mut self, name: &str, cells: Vec<Cell>) {
        self.columns.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Removes a column and its cells. No-op when the column is absent.
    pub(crate) fn drop_column(&mut self, name: &str) {
        if let Some(i) = self.column_index(name) {
            self.columns.remove(i);
            for row in &mut self.rows {
                row.remove(i);
            }
        }
    }
}

/// A processed table plus any non-fatal diagnostics raised while
/// producing it.
#[derive(Debug)]
pub struct TableResult {
    pub table: Table,
    pub warnings: Vec<Warning>,
}
