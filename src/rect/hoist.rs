//! Hoist: pull selected nested values up into their own columns
//!
//! Hoisting is a targeted widen. Each [`ColumnSpec`] names an output column
//! and the [`Path`] to fetch it from; everything that was not taken stays in
//! the source column so later widen/lengthen/hoist calls can keep working on
//! it.
//!
//! Residual rule, applied per row after every lookup is done:
//!
//! - a single-selector spec removes the field (or list element) it took
//! - a deeper spec removes its top-level branch only when nothing is left in
//!   that branch once all hoisted leaves are taken out
//! - a branch that is not removed is kept exactly as it was

use crate::error::Result;
use crate::names::{reconcile, NameRepair};
use crate::path::{resolve, select, Path, Selector};
use crate::rect::map_rows;
use crate::table::{Column, Table};
use crate::value::NestedValue;
use std::collections::HashSet;

/// One hoisted column: output name and where to find its value
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub path: Path,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, path: Path) -> Self {
        ColumnSpec {
            name: name.into(),
            path,
        }
    }
}

/// Configuration for [`hoist`]
#[derive(Debug, Clone)]
pub struct HoistOptions {
    /// What to do when a spec name clashes with a column or another spec
    pub names_repair: NameRepair,

    /// Remove hoisted data from the source column
    pub remove: bool,
}

impl Default for HoistOptions {
    fn default() -> Self {
        HoistOptions {
            names_repair: NameRepair::default(),
            remove: true,
        }
    }
}

impl HoistOptions {
    pub fn names_repair(mut self, policy: NameRepair) -> Self {
        self.names_repair = policy;
        self
    }

    pub fn remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }
}

/// Extract each spec's path from `column` into a new column.
///
/// New columns appear just before `column`, in spec order. Paths that do not
/// resolve for a row give a missing value. The row count never changes.
pub fn hoist(
    table: &Table,
    column: &str,
    specs: &[ColumnSpec],
    options: &HoistOptions,
) -> Result<Table> {
    let target = table.require_column(column)?;
    if specs.is_empty() {
        return Ok(table.clone());
    }

    let proposed: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    let existing: HashSet<String> = table.names().into_iter().map(String::from).collect();
    let names = reconcile(&proposed, &existing, options.names_repair)?;

    let values = &table.columns()[target].values;
    let rows: Vec<(Vec<NestedValue>, Option<NestedValue>)> = map_rows(table.nrows(), |row| {
        let value = &values[row];
        let hoisted = specs
            .iter()
            .map(|spec| resolve(value, &spec.path).cloned().unwrap_or(NestedValue::Null))
            .collect();
        let rest = options.remove.then(|| residual(value, specs));
        (hoisted, rest)
    });

    let mut hoisted_columns: Vec<Vec<NestedValue>> = (0..specs.len())
        .map(|_| Vec::with_capacity(table.nrows()))
        .collect();
    let mut residuals: Vec<NestedValue> = Vec::with_capacity(table.nrows());
    for (row, (hoisted, rest)) in rows.into_iter().enumerate() {
        for (j, value) in hoisted.into_iter().enumerate() {
            hoisted_columns[j].push(value);
        }
        residuals.push(rest.unwrap_or_else(|| values[row].clone()));
    }

    let mut columns = Vec::with_capacity(table.ncols() + specs.len());
    for (i, existing_column) in table.columns().iter().enumerate() {
        if i == target {
            columns.extend(
                names
                    .iter()
                    .zip(hoisted_columns.drain(..))
                    .map(|(name, values)| Column::new(name.clone(), values)),
            );
            columns.push(Column::new(existing_column.name.clone(), std::mem::take(&mut residuals)));
        } else {
            columns.push(existing_column.clone());
        }
    }

    tracing::debug!(
        column,
        rows = table.nrows(),
        specs = specs.len(),
        remove = options.remove,
        "hoisted columns"
    );

    Ok(Table::from_parts(columns, table.nrows()))
}

/// What is left of `value` once the specs' data has been taken out
fn residual(value: &NestedValue, specs: &[ColumnSpec]) -> NestedValue {
    let mut firsts: Vec<&Selector> = Vec::new();
    for spec in specs {
        if let Some(first) = spec.path.first() {
            if !firsts.contains(&first) {
                firsts.push(first);
            }
        }
    }

    let consumed: Vec<&Selector> = firsts
        .into_iter()
        .filter(|first| branch_consumed(value, first, specs))
        .collect();
    if consumed.is_empty() {
        return value.clone();
    }

    match value {
        NestedValue::Record(record) => {
            let mut rest = record.clone();
            for selector in consumed {
                if let Selector::Field(name) = selector {
                    rest.remove(name);
                }
            }
            NestedValue::Record(rest)
        }
        NestedValue::List(items) => NestedValue::List(
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| !consumed.contains(&&Selector::Index(i + 1)))
                .map(|(_, item)| item.clone())
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Whether the top-level branch at `first` should be dropped from the residual
fn branch_consumed(value: &NestedValue, first: &Selector, specs: &[ColumnSpec]) -> bool {
    let Some(branch) = select(value, first) else {
        return false;
    };

    let mut tails: Vec<&[Selector]> = Vec::new();
    for spec in specs {
        let selectors = spec.path.selectors();
        if selectors.first() == Some(first) {
            // Taken whole by a single-selector spec
            if selectors.len() == 1 {
                return true;
            }
            tails.push(&selectors[1..]);
        }
    }

    fully_taken(branch, &tails)
}

/// True if hoisting `tails` out of `value` leaves no data behind and at least
/// one tail actually matched something.
fn fully_taken(value: &NestedValue, tails: &[&[Selector]]) -> bool {
    if tails.iter().any(|t| t.is_empty()) {
        return true;
    }

    let children: Vec<(Selector, &NestedValue)> = match value {
        NestedValue::Record(record) => record
            .iter()
            .map(|(k, v)| (Selector::Field(k.to_string()), v))
            .collect(),
        NestedValue::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Selector::Index(i + 1), v))
            .collect(),
        _ => return false,
    };

    let mut taken_any = false;
    for (selector, child) in children {
        let sub: Vec<&[Selector]> = tails
            .iter()
            .filter(|t| t[0] == selector)
            .map(|t| &t[1..])
            .collect();

        // Vacant children hold nothing to keep, targeted or not
        if child.is_vacant() {
            taken_any |= sub.iter().any(|t| t.is_empty());
            continue;
        }
        if sub.is_empty() {
            return false;
        } else if fully_taken(child, &sub) {
            taken_any = true;
        } else {
            return false;
        }
    }

    taken_any
}
