//! Raw tabular results as returned by a query executor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name, as used for row keys.
    pub name: String,
    /// Source-reported type name (for example `int4` or `text`).
    #[serde(rename = "type", default)]
    pub data_type: String,
}

impl Column {
    /// Creates a column with the given name and type name.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Rows plus column metadata.
///
/// A `QueryResult` is never mutated once produced; processors read it and
/// build new values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Rows in source order.
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Columns in source order.
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl QueryResult {
    /// Creates an empty result with the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    /// Appends a row. Non-object values are ignored.
    pub fn with_row(mut self, row: Value) -> Self {
        if let Value::Object(map) = row {
            self.rows.push(map);
        }
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_shape() {
        let result: QueryResult = serde_json::from_value(json!({
            "rows": [{"label": "a", "value": 1}],
            "columns": [{"name": "label", "type": "text"}, {"name": "value", "type": "int4"}]
        }))
        .unwrap();

        assert_eq!(result.row_count(), 1);
        assert_eq!(result.column("value").unwrap().data_type, "int4");
        assert!(result.column("missing").is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let result: QueryResult = serde_json::from_value(json!({})).unwrap();
        assert!(result.is_empty());
        assert!(result.columns.is_empty());
    }

    #[test]
    fn test_with_row_ignores_non_objects() {
        let result = QueryResult::new(vec![Column::new("x", "int4")])
            .with_row(json!({"x": 1}))
            .with_row(json!([1, 2]));
        assert_eq!(result.row_count(), 1);
    }
}
