//! Column type inference
//!
//! Rectangling produces columns that may hold scalars, lists or records.
//! This module assigns each column a single type so callers can tell which
//! columns are fully flat and which still need unnesting.

pub mod column_type;

pub use column_type::{ColumnType, ColumnTypeBuilder};
