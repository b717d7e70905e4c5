//! Path resolution over nested values
//!
//! A [`Path`] is a sequence of selectors walked from the root of a value.
//! Absence is an ordinary outcome: rows of real-world data rarely share the
//! same shape, so a missing field or an out-of-range index resolves to `None`
//! rather than an error.

use crate::error::{RectError, Result};
use crate::value::NestedValue;
use std::fmt;
use std::str::FromStr;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Select a record field by name
    Field(String),
    /// Select a list element by 1-based position
    Index(usize),
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Field(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Field(name)
    }
}

impl From<usize> for Selector {
    fn from(position: usize) -> Self {
        Selector::Index(position)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Field(name) => write!(f, "{}", name),
            Selector::Index(i) => write!(f, "{}", i),
        }
    }
}

/// An ordered sequence of selectors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    selectors: Vec<Selector>,
}

impl Path {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Path { selectors }
    }

    /// Single-field path
    pub fn field(name: impl Into<String>) -> Self {
        Path::new(vec![Selector::Field(name.into())])
    }

    /// Append a field selector
    pub fn push_field(mut self, name: impl Into<String>) -> Self {
        self.selectors.push(Selector::Field(name.into()));
        self
    }

    /// Append a 1-based index selector
    pub fn push_index(mut self, position: usize) -> Self {
        self.selectors.push(Selector::Index(position));
        self
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn first(&self) -> Option<&Selector> {
        self.selectors.first()
    }

    /// Parse a dot-separated path such as `labels.1.name`.
    ///
    /// All-digit segments are 1-based indices, everything else is a field
    /// name. Empty segments and index `0` are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(Path::default());
        }

        let mut selectors = Vec::new();
        for segment in text.split('.') {
            if segment.is_empty() {
                return Err(RectError::InvalidPath(text.to_string()));
            }
            if segment.bytes().all(|b| b.is_ascii_digit()) {
                let position: usize = segment
                    .parse()
                    .map_err(|_| RectError::InvalidPath(text.to_string()))?;
                if position == 0 {
                    return Err(RectError::InvalidPath(text.to_string()));
                }
                selectors.push(Selector::Index(position));
            } else {
                selectors.push(Selector::Field(segment.to_string()));
            }
        }
        Ok(Path::new(selectors))
    }
}

impl<S: Into<Selector>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path::new(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for Path {
    type Err = RectError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

/// Apply a single selector to a value
pub fn select<'a>(value: &'a NestedValue, selector: &Selector) -> Option<&'a NestedValue> {
    match (selector, value) {
        (Selector::Field(name), NestedValue::Record(record)) => record.get(name),
        (Selector::Index(position), NestedValue::List(items)) => {
            position.checked_sub(1).and_then(|i| items.get(i))
        }
        _ => None,
    }
}

/// Resolve `path` against `value`. `None` means the path is absent.
pub fn resolve<'a>(value: &'a NestedValue, path: &Path) -> Option<&'a NestedValue> {
    path.selectors
        .iter()
        .try_fold(value, |current, selector| select(current, selector))
}
