//! Widen: spread record fields into sibling columns

use crate::error::{RectError, Result};
use crate::names::{reconcile, NameRepair};
use crate::rect::map_rows;
use crate::table::{Column, Table};
use crate::value::NestedValue;
use std::collections::HashSet;

/// Configuration for [`widen`]
#[derive(Debug, Clone, Default)]
pub struct WidenOptions {
    /// What to do when a field name clashes with another column
    pub names_repair: NameRepair,

    /// If set, output columns are named `{column}{sep}{field}`
    pub names_sep: Option<String>,
}

impl WidenOptions {
    pub fn names_repair(mut self, policy: NameRepair) -> Self {
        self.names_repair = policy;
        self
    }

    pub fn names_sep(mut self, sep: impl Into<String>) -> Self {
        self.names_sep = Some(sep.into());
        self
    }
}

/// Replace the record column `column` with one column per field.
///
/// Fields are collected across all rows in first-seen order. Rows whose value
/// is null, an empty list, a scalar, or a record lacking the field get a
/// missing value in that column. A non-empty list is a shape error.
pub fn widen(table: &Table, column: &str, options: &WidenOptions) -> Result<Table> {
    let target = table.require_column(column)?;
    let values = &table.columns()[target].values;

    let fields = collect_fields(column, values)?;

    let proposed: Vec<String> = match &options.names_sep {
        Some(sep) => fields.iter().map(|f| format!("{}{}{}", column, sep, f)).collect(),
        None => fields.clone(),
    };
    let existing: HashSet<String> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(_, c)| c.name.clone())
        .collect();
    let names = reconcile(&proposed, &existing, options.names_repair)?;

    // Row-major extraction, transposed below
    let rows: Vec<Vec<NestedValue>> = map_rows(table.nrows(), |row| match &values[row] {
        NestedValue::Record(record) => fields
            .iter()
            .map(|f| record.get(f).cloned().unwrap_or(NestedValue::Null))
            .collect(),
        _ => vec![NestedValue::Null; fields.len()],
    });

    let mut spread: Vec<Vec<NestedValue>> = (0..fields.len())
        .map(|_| Vec::with_capacity(table.nrows()))
        .collect();
    for row in rows {
        for (j, value) in row.into_iter().enumerate() {
            spread[j].push(value);
        }
    }

    let mut columns = Vec::with_capacity(table.ncols() + fields.len());
    for (i, existing_column) in table.columns().iter().enumerate() {
        if i == target {
            columns.extend(
                names
                    .iter()
                    .zip(spread.drain(..))
                    .map(|(name, values)| Column::new(name.clone(), values)),
            );
        } else {
            columns.push(existing_column.clone());
        }
    }

    tracing::debug!(
        column,
        rows = table.nrows(),
        fields = fields.len(),
        "widened column"
    );

    Ok(Table::from_parts(columns, table.nrows()))
}

/// Distinct field names across all records, in first-seen order
fn collect_fields(column: &str, values: &[NestedValue]) -> Result<Vec<String>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut fields = Vec::new();

    for (row, value) in values.iter().enumerate() {
        match value {
            NestedValue::Record(record) => {
                for key in record.keys() {
                    if seen.insert(key) {
                        fields.push(key.to_string());
                    }
                }
            }
            NestedValue::List(items) if !items.is_empty() => {
                return Err(RectError::ShapeMismatch {
                    column: column.to_string(),
                    row,
                    expected: "record",
                    found: "list",
                });
            }
            // Null, empty lists and scalars add no fields
            _ => {}
        }
    }

    Ok(fields)
}
