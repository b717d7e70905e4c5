//! Reading decoded JSON into a single list-column table

use crate::table::Table;
use crate::value::NestedValue;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;

/// Input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One JSON document. A top-level array becomes one row per element.
    #[default]
    Json,
    /// Newline-delimited JSON, one row per non-blank line
    Ndjson,
}

/// Read `reader` into a one-column table named `column`.
///
/// JSON documents are parsed with SIMD acceleration; when that fails the
/// input is retried as newline-delimited JSON.
pub fn read_table<R: Read>(mut reader: R, column: &str, format: Format) -> Result<Table> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    let rows = match format {
        Format::Json => match simd_json::serde::from_slice::<Value>(&mut content.clone()) {
            Ok(Value::Array(items)) => items,
            Ok(document) => vec![document],
            Err(err) => {
                tracing::debug!(error = %err, "input is not a single JSON document, reading as NDJSON");
                parse_lines(&content)?
            }
        },
        Format::Ndjson => parse_lines(&content)?,
    };

    tracing::debug!(column, rows = rows.len(), "ingested input");
    Ok(table_from_values(column, rows))
}

/// Build a one-column table from already decoded values
pub fn table_from_values(column: &str, values: Vec<Value>) -> Table {
    Table::from_column(column, values.into_iter().map(NestedValue::from).collect())
}

fn parse_lines(content: &[u8]) -> Result<Vec<Value>> {
    let text = std::str::from_utf8(content).context("Input is not valid UTF-8")?;
    let mut rows = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", number + 1))?;
        rows.push(value);
    }
    Ok(rows)
}
