//! Rectangling engines - turn nested list-columns into flat columns and rows
//!
//! Each engine consumes one column of a [`Table`](crate::table::Table) and
//! returns a new table:
//!
//! - [`widen`]: one column per record field
//! - [`lengthen`]: one row per list element
//! - [`hoist`]: pull selected paths out into columns, leave the rest in place
//!
//! Column naming is always decided by a sequential first-seen scan. With the
//! `parallel` feature, per-row value extraction runs on rayon and is collected
//! back in row order, so the output does not depend on scheduling.

pub mod hoist;
pub mod lengthen;
pub mod widen;

pub use hoist::{hoist, ColumnSpec, HoistOptions};
pub use lengthen::{lengthen, LengthenOptions};
pub use widen::{widen, WidenOptions};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map every row index through `f`, keeping row order
#[cfg(feature = "parallel")]
pub(crate) fn map_rows<T, F>(nrows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..nrows).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_rows<T, F>(nrows: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..nrows).map(f).collect()
}
