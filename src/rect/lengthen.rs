//! Lengthen: one output row per element of a list-column

use crate::error::{RectError, Result};
use crate::names::{reconcile, NameRepair};
use crate::table::{Column, Table};
use crate::value::NestedValue;
use std::collections::HashSet;

/// Configuration for [`lengthen`]
#[derive(Debug, Clone, Default)]
pub struct LengthenOptions {
    /// Name of the element column. Defaults to the unnested column's name.
    pub values_to: Option<String>,

    /// Name of the index column. `None` omits it.
    pub indices_to: Option<String>,

    /// Keep rows with no elements as a single row of missing values
    pub keep_empty: bool,
}

impl LengthenOptions {
    pub fn values_to(mut self, name: impl Into<String>) -> Self {
        self.values_to = Some(name.into());
        self
    }

    pub fn indices_to(mut self, name: impl Into<String>) -> Self {
        self.indices_to = Some(name.into());
        self
    }

    pub fn keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }
}

/// Expand every element of `column` into its own row.
///
/// Lists yield their elements with 1-based positions as indices; records yield
/// their field values with the field names as indices; null yields nothing, so
/// the row disappears unless `keep_empty` is set. All other columns are
/// repeated for each emitted row. Scalars are a shape error.
pub fn lengthen(table: &Table, column: &str, options: &LengthenOptions) -> Result<Table> {
    let target = table.require_column(column)?;
    let values = &table.columns()[target].values;

    let values_name = options.values_to.clone().unwrap_or_else(|| column.to_string());
    let mut proposed = vec![values_name];
    proposed.extend(options.indices_to.clone());

    let existing: HashSet<String> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(_, c)| c.name.clone())
        .collect();
    let names = reconcile(&proposed, &existing, NameRepair::CheckUnique)?;

    // Source row of every output row
    let mut source_rows: Vec<usize> = Vec::new();
    let mut elements: Vec<NestedValue> = Vec::new();
    let mut indices: Vec<NestedValue> = Vec::new();

    for (row, value) in values.iter().enumerate() {
        let before = elements.len();
        match value {
            NestedValue::Null => {}
            NestedValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    elements.push(item.clone());
                    indices.push(NestedValue::from((i + 1) as i64));
                }
            }
            NestedValue::Record(record) => {
                for (key, item) in record.iter() {
                    elements.push(item.clone());
                    indices.push(NestedValue::from(key));
                }
            }
            NestedValue::Scalar(_) => {
                return Err(RectError::ShapeMismatch {
                    column: column.to_string(),
                    row,
                    expected: "list or record",
                    found: value.kind(),
                });
            }
        }

        if elements.len() == before && options.keep_empty {
            elements.push(NestedValue::Null);
            indices.push(NestedValue::Null);
        }
        source_rows.extend(std::iter::repeat(row).take(elements.len() - before));
    }

    let nrows = source_rows.len();
    let mut new_columns = vec![Column::new(names[0].clone(), elements)];
    if let Some(index_name) = names.get(1) {
        new_columns.push(Column::new(index_name.clone(), indices));
    }

    let mut columns = Vec::with_capacity(table.ncols() + 1);
    let mut new_columns = Some(new_columns);
    for (i, existing_column) in table.columns().iter().enumerate() {
        if i == target {
            columns.extend(new_columns.take().unwrap_or_default());
        } else {
            let repeated = source_rows
                .iter()
                .map(|&row| existing_column.values[row].clone())
                .collect();
            columns.push(Column::new(existing_column.name.clone(), repeated));
        }
    }

    tracing::debug!(
        column,
        rows_in = table.nrows(),
        rows_out = nrows,
        "lengthened column"
    );

    Ok(Table::from_parts(columns, nrows))
}
