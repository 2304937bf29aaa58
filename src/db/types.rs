//! Value and result types for menu-maker.
//!
//! Defines the structures used to carry statement results out of the store
//! and records in and out of the tools.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};

/// An ordered mapping of field name to value.
///
/// Field order is preserved through JSON serialization, so a record built
/// from a result row lists its keys in column order.
pub type Record = IndexMap<String, Value>;

/// The raw result of executing one statement in a store session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    /// Column names from the statement descriptor, in order.
    ///
    /// Empty when the statement describes no result shape (DDL, INSERT, UPDATE...).
    pub columns: Vec<String>,

    /// Rows of data, each with one value per column.
    pub rows: Vec<Row>,
}

impl StatementResult {
    /// Creates a result for a statement that yields columns.
    pub fn with_data(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Creates a result for a statement without a result shape.
    pub fn no_result() -> Self {
        Self::default()
    }

    /// Returns true if the statement described a tabular result.
    pub fn is_describable(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Zips column names to row values, producing one record per row.
    ///
    /// Fails if any row is wider or narrower than the column list.
    pub fn into_records(self) -> Result<Vec<Record>> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != columns.len() {
                    return Err(MenuError::query(format!(
                        "Row {index} has {} values for {} columns",
                        row.len(),
                        columns.len()
                    )));
                }
                Ok(columns.iter().cloned().zip(row).collect())
            })
            .collect()
    }
}

/// A row of data from a statement result.
pub type Row = Vec<Value>;

/// Represents a single value.
///
/// Serializes as the bare JSON value: `null`, `true`, `42`, `4.5`, `"text"`.
/// Values read from the store are always scalars; arrays and objects only
/// arrive in caller-supplied records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Any other JSON value (arrays, objects) from caller-supplied records.
    Json(serde_json::Value),
}

impl Value {
    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a short name for the kind of value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "text",
            Value::Bytes(_) => "blob",
            Value::Json(serde_json::Value::Array(_)) => "array",
            Value::Json(serde_json::Value::Object(_)) => "object",
            Value::Json(_) => "json",
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
