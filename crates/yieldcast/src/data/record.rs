//! Loosely typed input records.
//!
//! Records arrive from spreadsheets and browser storage with whatever cell
//! types the host produced. They are coerced to numbers exactly once, when a
//! [`DatasetSchema`](super::DatasetSchema) resolves them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single raw cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    /// Numeric cell.
    Number(f64),
    /// Text cell, possibly holding a number.
    Text(String),
    /// Boolean cell (never numeric).
    Flag(bool),
    /// Missing or null cell.
    Empty,
}

impl RawCell {
    /// Numeric value of the cell; anything missing, non-numeric or
    /// non-finite becomes 0.
    pub fn coerce(&self) -> f64 {
        let value = match self {
            RawCell::Number(v) => *v,
            RawCell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            RawCell::Flag(_) | RawCell::Empty => 0.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::from(value.as_str())
    }
}

/// One input row: column name to raw cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    cells: BTreeMap<String, RawCell>,
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<RawCell>) -> Self {
        self.insert(column, cell);
        self
    }

    /// Insert or replace a cell.
    pub fn insert(&mut self, column: impl Into<String>, cell: impl Into<RawCell>) {
        self.cells.insert(column.into(), cell.into());
    }

    /// Raw cell for a column, if present.
    pub fn cell(&self, column: &str) -> Option<&RawCell> {
        self.cells.get(column)
    }

    /// Coerced numeric value for a column (0 when missing).
    pub fn value(&self, column: &str) -> f64 {
        self.cells.get(column).map_or(0.0, RawCell::coerce)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the record has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawCell>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
