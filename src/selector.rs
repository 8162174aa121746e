//! Column projection preserving the table's own column order.

use crate::error::{Result, SweeperError};
use polars::prelude::*;
use std::collections::HashSet;

/// Project `df` onto the requested column names.
///
/// Duplicate requested names collapse to a single selection. The result
/// keeps the table's original column ordering restricted to the requested
/// set, not the order of the request. A name the table does not have fails
/// with [`SweeperError::UnknownColumn`] and produces nothing, so the caller
/// keeps its prior table.
pub fn select_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let existing: HashSet<&str> = df
        .get_column_names()
        .iter()
        .map(|n| n.as_str())
        .collect();

    let mut requested: HashSet<&str> = HashSet::with_capacity(names.len());
    for name in names {
        if !existing.contains(name.as_str()) {
            return Err(SweeperError::UnknownColumn(name.clone()));
        }
        requested.insert(name.as_str());
    }

    let ordered: Vec<&str> = df
        .get_column_names()
        .iter()
        .map(|n| n.as_str())
        .filter(|n| requested.contains(n))
        .collect();

    df.select(ordered).map_err(Into::into)
}
