//! # Rectangle - flatten nested JSON into tables
//!
//! Tools for rectangling: turning deeply nested, irregular JSON-like trees into
//! plain rows and columns, one step at a time.
//!
//! ## Modules
//!
//! - **value**: the nested value model (null, scalar, list, record)
//! - **path**: selector paths and absent-tolerant resolution
//! - **table**: a minimal ordered, equal-length, named-column table
//! - **rect**: the widen, lengthen and hoist engines
//! - **names**: output column name repair
//! - **schema**: column type inference
//! - **ingest**: JSON / NDJSON input
//!
//! ## Quick Start
//!
//! ```rust
//! use rectangle::{hoist, lengthen, widen, ColumnSpec, HoistOptions, LengthenOptions, Path, WidenOptions};
//! use rectangle::ingest::table_from_values;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let users = table_from_values("user", vec![
//!     json!({"login": "a", "repos": [{"name": "x", "owner": {"id": 1}}]}),
//!     json!({"login": "b", "repos": []}),
//! ]);
//!
//! let users = widen(&users, "user", &WidenOptions::default())?;
//! let repos = lengthen(&users, "repos", &LengthenOptions::default())?;
//! let repos = hoist(
//!     &repos,
//!     "repos",
//!     &[ColumnSpec::new("owner_id", Path::parse("owner.id")?)],
//!     &HoistOptions::default(),
//! )?;
//!
//! assert_eq!(repos.names(), vec!["login", "owner_id", "repos"]);
//! assert_eq!(repos.nrows(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ingest;
pub mod names;
pub mod path;
pub mod rect;
pub mod schema;
pub mod table;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{RectError, Result};
pub use names::{reconcile, NameRepair};
pub use path::{resolve, Path, Selector};
pub use rect::{hoist, lengthen, widen, ColumnSpec, HoistOptions, LengthenOptions, WidenOptions};
pub use schema::ColumnType;
pub use table::{Column, Table};
pub use value::{NestedValue, Record, Scalar};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_rectangling() {
        let table = ingest::table_from_values(
            "json",
            vec![
                json!({"id": 1, "tags": ["rust", "json"]}),
                json!({"id": 2, "tags": ["data"]}),
            ],
        );

        let wide = widen(&table, "json", &WidenOptions::default()).unwrap();
        let long = lengthen(&wide, "tags", &LengthenOptions::default()).unwrap();

        assert_eq!(long.names(), vec!["id", "tags"]);
        assert_eq!(long.nrows(), 3);
        assert_eq!(
            long.describe(),
            vec![("id", ColumnType::Integer), ("tags", ColumnType::Character)]
        );
    }
}
