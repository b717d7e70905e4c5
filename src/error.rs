//! Error types for rectangling operations

use thiserror::Error;

/// Errors raised by the rectangling engines.
///
/// Every variant describes a structural mismatch between the requested
/// operation and the data. None of them are transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RectError {
    /// A value has the wrong shape for the operation at a given row
    #[error("column `{column}`, row {row}: expected {expected}, found {found}")]
    ShapeMismatch {
        column: String,
        row: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Two or more output columns would share a name
    #[error("names must be unique; duplicated: {}", .names.join(", "))]
    NameCollision { names: Vec<String> },

    /// An output name was empty under a strict policy
    #[error("names must not be empty (position {position})")]
    EmptyName { position: usize },

    #[error("column `{0}` does not exist")]
    UnknownColumn(String),

    /// A column's length does not match the table's row count
    #[error("column `{column}` has {found} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid path `{0}`")]
    InvalidPath(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RectError>;
