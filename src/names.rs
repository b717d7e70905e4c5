//! Output column name reconciliation
//!
//! Widen and hoist both turn raw field names (or user-chosen spec names) into
//! column names. Those can clash with columns already in the table or with
//! each other; [`NameRepair`] decides what happens then.

use crate::error::{RectError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// Names produced by a previous `unique` repair, e.g. `id...2`
static REPAIR_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\.\.\.\d+$").expect("valid suffix regex"));

/// Collision policy for output column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameRepair {
    /// Append a `...N` suffix to every clashing name
    Unique,
    /// Raise [`RectError::NameCollision`] on any clash. Also accepted as `fail`.
    #[default]
    CheckUnique,
    /// Let duplicate names through untouched
    Minimal,
}

impl FromStr for NameRepair {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unique" => Ok(NameRepair::Unique),
            "check_unique" | "fail" => Ok(NameRepair::CheckUnique),
            "minimal" => Ok(NameRepair::Minimal),
            other => Err(format!(
                "unknown names repair policy `{}` (expected unique, check_unique, fail or minimal)",
                other
            )),
        }
    }
}

impl fmt::Display for NameRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameRepair::Unique => "unique",
            NameRepair::CheckUnique => "check_unique",
            NameRepair::Minimal => "minimal",
        };
        f.write_str(s)
    }
}

/// Reconcile `proposed` names against the names already in use.
///
/// The result has the same length and order as `proposed`. Under
/// [`NameRepair::Unique`] the first proposed occurrence of a name that is not
/// already in `existing` keeps its name; later clashes get the smallest free
/// `...N` suffix.
pub fn reconcile<S: AsRef<str>>(
    proposed: &[S],
    existing: &HashSet<String>,
    policy: NameRepair,
) -> Result<Vec<String>> {
    match policy {
        NameRepair::Minimal => Ok(proposed.iter().map(|s| s.as_ref().to_string()).collect()),
        NameRepair::CheckUnique => check_unique(proposed, existing),
        NameRepair::Unique => Ok(make_unique(proposed, existing)),
    }
}

fn check_unique<S: AsRef<str>>(proposed: &[S], existing: &HashSet<String>) -> Result<Vec<String>> {
    if let Some(position) = proposed.iter().position(|s| s.as_ref().is_empty()) {
        return Err(RectError::EmptyName { position: position + 1 });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicated: Vec<String> = Vec::new();
    for name in proposed {
        let name = name.as_ref();
        let clashes = existing.contains(name) || !seen.insert(name);
        if clashes && !duplicated.iter().any(|d| d == name) {
            duplicated.push(name.to_string());
        }
    }

    if !duplicated.is_empty() {
        return Err(RectError::NameCollision { names: duplicated });
    }
    Ok(proposed.iter().map(|s| s.as_ref().to_string()).collect())
}

pub(crate) fn make_unique<S: AsRef<str>>(proposed: &[S], existing: &HashSet<String>) -> Vec<String> {
    // Every name already spoken for, so a suffixed name never steals a later one
    let mut taken: HashSet<String> = existing.clone();
    taken.extend(proposed.iter().map(|s| s.as_ref().to_string()));

    let mut used: HashSet<String> = existing.clone();
    let mut result = Vec::with_capacity(proposed.len());

    for (i, name) in proposed.iter().enumerate() {
        let name = name.as_ref();
        if name.is_empty() {
            let repaired = free_name("", i + 1, &taken);
            taken.insert(repaired.clone());
            used.insert(repaired.clone());
            result.push(repaired);
            continue;
        }

        if !used.contains(name) {
            used.insert(name.to_string());
            result.push(name.to_string());
            continue;
        }

        let base = REPAIR_SUFFIX_REGEX
            .captures(name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(name);
        let repaired = free_name(base, 1, &taken);
        taken.insert(repaired.clone());
        used.insert(repaired.clone());
        result.push(repaired);
    }

    result
}

fn free_name(base: &str, start: usize, taken: &HashSet<String>) -> String {
    (start..)
        .map(|k| format!("{}...{}", base, k))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
