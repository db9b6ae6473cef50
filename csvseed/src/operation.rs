//! Insert operations handed to an execution engine.
//!
//! # Output Format
//!
//! Operations serialize with columns in insert order:
//!
//! ```json
//! { "table": "table_1", "values": { "a": "10", "b": "100" } }
//! ```

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::value::Value;

/// One row to insert into one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOperation {
    table: Arc<str>,
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl InsertOperation {
    /// `columns` and `values` must have the same length.
    pub(crate) fn new(table: Arc<str>, columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self {
            table,
            columns,
            values,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of `column`, matched exactly.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// `(column, value)` pairs in insert order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

struct ColumnValues<'a>(&'a InsertOperation);

impl Serialize for ColumnValues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len()))?;
        for (column, value) in self.0.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Serialize for InsertOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut op = serializer.serialize_struct("InsertOperation", 2)?;
        op.serialize_field("table", &*self.table)?;
        op.serialize_field("values", &ColumnValues(self))?;
        op.end()
    }
}

/// Render operations as a pretty-printed JSON array.
pub fn to_json(operations: &[InsertOperation]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(operations)
}
