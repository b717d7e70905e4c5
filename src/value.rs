//! Nested value model
//!
//! A uniform in-memory representation of decoded JSON/XML-like trees. Every
//! engine in this crate pattern-matches over [`NestedValue`]; nothing relies on
//! runtime reflection.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

/// A primitive leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
}

/// A node of a nested tree.
///
/// `Null` is also the missing-value marker in output columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NestedValue {
    #[default]
    Null,
    Scalar(Scalar),
    List(Vec<NestedValue>),
    Record(Record),
}

/// Ordered mapping from field name to value. Keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, NestedValue)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert a field, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: NestedValue) -> Option<NestedValue> {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.fields.push((key, value));
        None
    }

    /// Remove a field, preserving the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<NestedValue> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NestedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, NestedValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, NestedValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, NestedValue);
    type IntoIter = std::vec::IntoIter<(String, NestedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl NestedValue {
    /// Short name of the value's shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            NestedValue::Null => "null",
            NestedValue::Scalar(_) => "scalar",
            NestedValue::List(_) => "list",
            NestedValue::Record(_) => "record",
        }
    }

    /// True for values that carry no data: null, empty lists and empty records
    pub fn is_vacant(&self) -> bool {
        match self {
            NestedValue::Null => true,
            NestedValue::List(items) => items.is_empty(),
            NestedValue::Record(record) => record.is_empty(),
            NestedValue::Scalar(_) => false,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            NestedValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NestedValue::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Convert back into a `serde_json::Value`. Non-finite floats become null.
    pub fn to_json(&self) -> Value {
        match self {
            NestedValue::Null => Value::Null,
            NestedValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            NestedValue::Scalar(Scalar::Int(i)) => Value::Number((*i).into()),
            NestedValue::Scalar(Scalar::UInt(u)) => Value::Number((*u).into()),
            NestedValue::Scalar(Scalar::Float(f)) => {
                Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
            NestedValue::Scalar(Scalar::Str(s)) => Value::String(s.clone()),
            NestedValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            NestedValue::Record(record) => {
                let mut map = Map::new();
                for (k, v) in record.iter() {
                    map.insert(k.to_string(), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl From<Value> for NestedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => NestedValue::Null,
            Value::Bool(b) => NestedValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NestedValue::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    NestedValue::Scalar(Scalar::UInt(u))
                } else {
                    NestedValue::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => NestedValue::Scalar(Scalar::Str(s)),
            Value::Array(arr) => NestedValue::List(arr.into_iter().map(NestedValue::from).collect()),
            Value::Object(obj) => NestedValue::Record(
                obj.into_iter()
                    .map(|(k, v)| (k, NestedValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for NestedValue {
    fn from(s: &str) -> Self {
        NestedValue::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for NestedValue {
    fn from(s: String) -> Self {
        NestedValue::Scalar(Scalar::Str(s))
    }
}

impl From<i64> for NestedValue {
    fn from(i: i64) -> Self {
        NestedValue::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for NestedValue {
    fn from(f: f64) -> Self {
        NestedValue::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for NestedValue {
    fn from(b: bool) -> Self {
        NestedValue::Scalar(Scalar::Bool(b))
    }
}

impl Serialize for NestedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NestedValue::Null => serializer.serialize_unit(),
            NestedValue::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            NestedValue::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            NestedValue::Scalar(Scalar::UInt(u)) => serializer.serialize_u64(*u),
            NestedValue::Scalar(Scalar::Float(f)) if f.is_finite() => serializer.serialize_f64(*f),
            NestedValue::Scalar(Scalar::Float(_)) => serializer.serialize_unit(),
            NestedValue::Scalar(Scalar::Str(s)) => serializer.serialize_str(s),
            NestedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NestedValue::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (k, v) in record.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_field_order() {
        let value = NestedValue::from(json!({"z": 1, "a": 2, "m": 3}));
        let record = value.as_record().unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(NestedValue::from(json!(3)), NestedValue::Scalar(Scalar::Int(3)));
        assert_eq!(NestedValue::from(json!(1.5)), NestedValue::Scalar(Scalar::Float(1.5)));
        assert_eq!(
            NestedValue::from(json!(u64::MAX)),
            NestedValue::Scalar(Scalar::UInt(u64::MAX))
        );
    }

    #[test]
    fn test_large_unsigned_survives_export() {
        let input = json!({"id": 18446744073709551615u64});
        let value = NestedValue::from(input.clone());

        assert_eq!(value.to_json(), input);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"id":18446744073709551615}"#);
    }

    #[test]
    fn test_record_insert_and_remove_keep_order() {
        let mut record = Record::new();
        record.insert("a", 1i64.into());
        record.insert("b", 2i64.into());
        record.insert("c", 3i64.into());

        assert_eq!(record.insert("b", 20i64.into()), Some(NestedValue::from(2i64)));
        assert_eq!(record.remove("a"), Some(NestedValue::from(1i64)));
        assert_eq!(record.remove("missing"), None);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(record.get("b"), Some(&NestedValue::from(20i64)));
    }

    #[test]
    fn test_vacant_values() {
        assert!(NestedValue::Null.is_vacant());
        assert!(NestedValue::List(vec![]).is_vacant());
        assert!(NestedValue::Record(Record::new()).is_vacant());
        assert!(!NestedValue::from(0i64).is_vacant());
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let input = json!({"id": 1, "tags": ["a", null], "meta": {"ok": true, "score": 0.5}});
        let value = NestedValue::from(input.clone());

        assert_eq!(value.to_json(), input);
        assert_eq!(serde_json::to_value(&value).unwrap(), input);
    }
}
