//! Per-column type inference with streaming accumulation
//!
//! Instead of inferring a type per value and merging the results, the builder
//! counts the kinds of values it sees and decides once at the end.

use crate::value::{NestedValue, Scalar};
use std::collections::HashMap;
use std::fmt;

/// The type assigned to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Only missing values were seen
    Unknown,
    Logical,
    Integer,
    Double,
    Character,
    /// Every non-missing value is a record
    Record,
    /// Lists, or a mix of kinds that no single atomic type covers
    List,
}

impl ColumnType {
    /// Infer the type of a column from its values
    pub fn infer(values: &[NestedValue]) -> Self {
        let mut builder = ColumnTypeBuilder::new();
        for value in values {
            builder.add_value(value);
        }
        builder.build()
    }

    fn to_str(self) -> &'static str {
        match self {
            ColumnType::Unknown => "unknown",
            ColumnType::Logical => "logical",
            ColumnType::Integer => "integer",
            ColumnType::Double => "double",
            ColumnType::Character => "character",
            ColumnType::Record => "record",
            ColumnType::List => "list",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Kind of a single non-missing value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKind {
    Boolean,
    Integer,
    Float,
    String,
    List,
    Record,
}

impl ValueKind {
    fn from_value(value: &NestedValue) -> Option<Self> {
        match value {
            NestedValue::Null => None,
            NestedValue::Scalar(Scalar::Bool(_)) => Some(ValueKind::Boolean),
            NestedValue::Scalar(Scalar::Int(_) | Scalar::UInt(_)) => Some(ValueKind::Integer),
            NestedValue::Scalar(Scalar::Float(_)) => Some(ValueKind::Float),
            NestedValue::Scalar(Scalar::Str(_)) => Some(ValueKind::String),
            NestedValue::List(_) => Some(ValueKind::List),
            NestedValue::Record(_) => Some(ValueKind::Record),
        }
    }
}

/// Accumulates value kinds for one column
#[derive(Debug, Default)]
pub struct ColumnTypeBuilder {
    kind_counts: HashMap<ValueKind, usize>,
}

impl ColumnTypeBuilder {
    pub fn new() -> Self {
        ColumnTypeBuilder::default()
    }

    pub fn add_value(&mut self, value: &NestedValue) {
        if let Some(kind) = ValueKind::from_value(value) {
            *self.kind_counts.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn build(&self) -> ColumnType {
        let has = |kind: ValueKind| self.kind_counts.contains_key(&kind);

        match self.kind_counts.len() {
            0 => ColumnType::Unknown,
            1 => {
                if has(ValueKind::Boolean) {
                    ColumnType::Logical
                } else if has(ValueKind::Integer) {
                    ColumnType::Integer
                } else if has(ValueKind::Float) {
                    ColumnType::Double
                } else if has(ValueKind::String) {
                    ColumnType::Character
                } else if has(ValueKind::Record) {
                    ColumnType::Record
                } else {
                    ColumnType::List
                }
            }
            // Integers widen to doubles; anything else mixed stays a list
            2 if has(ValueKind::Integer) && has(ValueKind::Float) => ColumnType::Double,
            _ => ColumnType::List,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(values: serde_json::Value) -> ColumnType {
        match NestedValue::from(values) {
            NestedValue::List(items) => ColumnType::infer(&items),
            other => ColumnType::infer(&[other]),
        }
    }

    #[test]
    fn test_atomic_types() {
        assert_eq!(infer(json!([true, null, false])), ColumnType::Logical);
        assert_eq!(infer(json!([1, 2, null])), ColumnType::Integer);
        assert_eq!(infer(json!([1, 2.5])), ColumnType::Double);
        assert_eq!(infer(json!([1, 18446744073709551615u64])), ColumnType::Integer);
        assert_eq!(infer(json!(["a", null])), ColumnType::Character);
        assert_eq!(infer(json!([null, null])), ColumnType::Unknown);
        assert_eq!(infer(json!([])), ColumnType::Unknown);
    }

    #[test]
    fn test_nested_types() {
        assert_eq!(infer(json!([{"a": 1}, null, {"b": 2}])), ColumnType::Record);
        assert_eq!(infer(json!([[1], []])), ColumnType::List);
        assert_eq!(infer(json!([{"a": 1}, [1]])), ColumnType::List);
        assert_eq!(infer(json!([1, "a"])), ColumnType::List);
    }

    #[test]
    fn test_builder_ignores_missing() {
        let mut builder = ColumnTypeBuilder::new();
        builder.add_value(&NestedValue::Null);
        builder.add_value(&NestedValue::from("x"));
        builder.add_value(&NestedValue::Null);

        assert_eq!(builder.build(), ColumnType::Character);
        assert_eq!(builder.build().to_string(), "character");
    }
}
