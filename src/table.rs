//! Minimal column-oriented table
//!
//! Just enough of a data frame for rectangling: ordered named columns of
//! equal length, where any column may hold nested values.

use crate::error::{RectError, Result};
use crate::names::make_unique;
use crate::schema::ColumnType;
use crate::value::{NestedValue, Record};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A named column of values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<NestedValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<NestedValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::infer(&self.values)
    }
}

/// An ordered sequence of equal-length columns. Row identity is positional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    // Unset until the first column arrives; kept even if every column is later dropped
    nrows: Option<usize>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Single-column table, the usual starting point for rectangling
    pub fn from_column(name: impl Into<String>, values: Vec<NestedValue>) -> Self {
        let nrows = values.len();
        Table {
            columns: vec![Column::new(name, values)],
            nrows: Some(nrows),
        }
    }

    /// Build a table from columns, checking that lengths agree
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Table::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn nrows(&self) -> usize {
        self.nrows.unwrap_or(0)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the first column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Table::column_index`] but an unknown name is an error
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| RectError::UnknownColumn(name.to_string()))
    }

    pub fn push_column(&mut self, column: Column) -> Result<()> {
        let at = self.columns.len();
        self.insert_column(at, column)
    }

    /// Insert a column at `index`. The first column of a fresh table sets the
    /// row count; a table that had all its columns widened away keeps its own.
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        match self.nrows {
            None => self.nrows = Some(column.len()),
            Some(expected) if column.len() != expected => {
                let found = column.len();
                return Err(RectError::LengthMismatch {
                    column: column.name,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        Ok(())
    }

    /// Values of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&NestedValue>> {
        if index >= self.nrows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Column names paired with their inferred types
    pub fn describe(&self) -> Vec<(&str, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type()))
            .collect()
    }

    /// Group the named columns into a single record column called `into`.
    ///
    /// The packed column takes the position of the first packed column; record
    /// fields follow the order of `names`. This undoes a widen when no fields
    /// were missing.
    pub fn pack<S: AsRef<str>>(&self, names: &[S], into: &str) -> Result<Table> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            indices.push(self.require_column(name.as_ref())?);
        }
        let Some(&position) = indices.iter().min() else {
            return Ok(self.clone());
        };

        let packed: Vec<NestedValue> = (0..self.nrows())
            .map(|row| {
                let record: Record = indices
                    .iter()
                    .map(|&i| (self.columns[i].name.clone(), self.columns[i].values[row].clone()))
                    .collect();
                NestedValue::Record(record)
            })
            .collect();

        let mut columns = Vec::with_capacity(self.columns.len().saturating_sub(indices.len()) + 1);
        for (i, column) in self.columns.iter().enumerate() {
            if i == position {
                columns.push(Column::new(into, packed.clone()));
            }
            if !indices.contains(&i) {
                columns.push(column.clone());
            }
        }

        Ok(Table {
            columns,
            nrows: self.nrows,
        })
    }

    /// Rows as JSON objects.
    ///
    /// JSON object keys must be unique, so duplicate column names (allowed by
    /// [`NameRepair::Minimal`](crate::names::NameRepair::Minimal)) are repaired with `...N` suffixes on export.
    pub fn to_records(&self) -> Vec<Value> {
        let names = self.names();
        let mut seen: HashSet<&str> = HashSet::new();
        let keys: Vec<String> = if names.iter().all(|name| seen.insert(*name)) {
            names.iter().map(|name| name.to_string()).collect()
        } else {
            tracing::warn!(columns = ?names, "duplicate column names, suffixing them for export");
            make_unique(&names, &HashSet::new())
        };

        (0..self.nrows())
            .map(|row| {
                let mut map = Map::new();
                for (key, column) in keys.iter().zip(&self.columns) {
                    map.insert(key.clone(), column.values[row].to_json());
                }
                Value::Object(map)
            })
            .collect()
    }

    // Engines assemble columns they have already sized to the row count
    pub(crate) fn from_parts(columns: Vec<Column>, nrows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == nrows));
        Table {
            columns,
            nrows: Some(nrows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(items: serde_json::Value) -> Vec<NestedValue> {
        match NestedValue::from(items) {
            NestedValue::List(items) => items,
            other => vec![other],
        }
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut table = Table::from_column("a", values(json!([1, 2, 3])));
        let err = table
            .push_column(Column::new("b", values(json!([1, 2]))))
            .unwrap_err();

        assert_eq!(
            err,
            RectError::LengthMismatch {
                column: "b".to_string(),
                expected: 3,
                found: 2
            }
        );
        assert_eq!(table.ncols(), 1);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = Table::from_column("a", values(json!([1, 2])));
        table.push_column(Column::new("c", values(json!(["x", "y"])))).unwrap();
        table.insert_column(1, Column::new("b", values(json!([true, false])))).unwrap();

        assert_eq!(table.names(), vec!["a", "b", "c"]);
        assert_eq!(table.column_index("c"), Some(2));
        assert_eq!(table.row(1).unwrap()[2], &NestedValue::from("y"));
        assert!(table.row(2).is_none());
        assert_eq!(
            table.require_column("zzz"),
            Err(RectError::UnknownColumn("zzz".to_string()))
        );
    }

    #[test]
    fn test_pack_groups_columns() {
        let table = Table::from_columns(vec![
            Column::new("n", values(json!([1, 2]))),
            Column::new("id", values(json!([10, 20]))),
            Column::new("login", values(json!(["a", "b"]))),
        ])
        .unwrap();

        let packed = table.pack(&["id", "login"], "user").unwrap();

        assert_eq!(packed.names(), vec!["n", "user"]);
        assert_eq!(
            packed.column("user").unwrap().values[1],
            NestedValue::from(json!({"id": 20, "login": "b"}))
        );
    }

    #[test]
    fn test_to_records() {
        let table = Table::from_columns(vec![
            Column::new("id", values(json!([1, 2]))),
            Column::new("tags", values(json!([["a"], null]))),
        ])
        .unwrap();

        assert_eq!(
            table.to_records(),
            vec![json!({"id": 1, "tags": ["a"]}), json!({"id": 2, "tags": null})]
        );
    }

    #[test]
    fn test_to_records_suffixes_duplicate_names() {
        let table = Table::from_columns(vec![
            Column::new("id", values(json!([1]))),
            Column::new("id", values(json!([2]))),
        ])
        .unwrap();

        let records = table.to_records();
        assert_eq!(records, vec![json!({"id": 1, "id...1": 2})]);
        assert_eq!(table.names(), vec!["id", "id"]);
    }
}
