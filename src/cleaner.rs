//! Cleaning transforms: row deduplication and mean imputation.
//!
//! Both transforms are pure: they take a borrowed table and return a new
//! one along with the counts the user feedback needs.

use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// Counts produced by a cleaning pass. User-facing feedback only, never
/// persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    /// Duplicate rows dropped by [`remove_duplicates`].
    pub duplicates_removed: usize,

    /// Columns whose nulls were filled by [`fill_missing_numeric`].
    pub columns_imputed: Vec<String>,
}

impl CleaningReport {
    /// True when the pass changed nothing, so the caller can report
    /// "no duplicates found" instead of "removed 0".
    pub fn is_noop(&self) -> bool {
        self.duplicates_removed == 0 && self.columns_imputed.is_empty()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_noop() {
            return "nothing to clean".to_owned();
        }
        format!(
            "removed {} duplicate row{}, imputed {} column{}",
            self.duplicates_removed,
            if self.duplicates_removed == 1 { "" } else { "s" },
            self.columns_imputed.len(),
            if self.columns_imputed.len() == 1 { "" } else { "s" },
        )
    }
}

/// Drop duplicate rows, keeping the first occurrence in original order.
///
/// Two rows are duplicates when all column values are equal; two nulls
/// compare equal for this purpose. Returns the deduplicated table and the
/// number of rows removed (zero means "no duplicates found").
pub fn remove_duplicates(df: &DataFrame) -> Result<(DataFrame, usize)> {
    if df.width() == 0 || df.height() == 0 {
        return Ok((df.clone(), 0));
    }

    let deduped = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    let removed = df.height() - deduped.height();
    Ok((deduped, removed))
}

/// Fill nulls in numeric columns with the column's arithmetic mean, computed
/// independently per column over the non-null values.
///
/// Columns with no nulls are untouched; columns with no non-null values are
/// left unchanged (the mean is undefined). Filled columns are promoted to
/// `Float64`. Returns the new table and the names of the affected columns.
pub fn fill_missing_numeric(df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
    let mut affected = Vec::new();
    let mut exprs = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        let nulls = column.null_count();
        if column.dtype().is_numeric() && nulls > 0 && nulls < column.len() {
            exprs.push(col(name).fill_null(col(name).mean()));
            affected.push(name.to_owned());
        } else {
            exprs.push(col(name));
        }
    }

    if affected.is_empty() {
        return Ok((df.clone(), affected));
    }

    let filled = df.clone().lazy().select(exprs).collect()?;
    Ok((filled, affected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() -> Result<()> {
        let df = df!(
            "a" => &[1, 1, 3],
            "b" => &[2, 2, 4]
        )?;

        let (deduped, removed) = remove_duplicates(&df)?;
        assert_eq!(removed, 1);

        let expected = df!(
            "a" => &[1, 3],
            "b" => &[2, 4]
        )?;
        assert!(deduped.equals(&expected));
        Ok(())
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() -> Result<()> {
        let df = df!(
            "a" => &[1, 1, 3, 1],
            "b" => &[2, 2, 4, 2]
        )?;

        let (once, removed) = remove_duplicates(&df)?;
        assert_eq!(removed, 2);
        assert!(once.height() <= df.height());

        let (twice, removed_again) = remove_duplicates(&once)?;
        assert_eq!(removed_again, 0);
        assert!(twice.equals(&once));
        Ok(())
    }

    #[test]
    fn test_remove_duplicates_treats_nulls_as_equal() -> Result<()> {
        let s1 = Series::new("a".into(), vec![Some(1.0), Some(1.0), Some(2.0)]);
        let s2 = Series::new("b".into(), vec![None::<f64>, None, Some(5.0)]);
        let df = DataFrame::new(vec![Column::from(s1), Column::from(s2)])?;

        let (deduped, removed) = remove_duplicates(&df)?;
        assert_eq!(removed, 1);
        assert_eq!(deduped.height(), 2);
        Ok(())
    }

    #[test]
    fn test_fill_missing_numeric_uses_column_mean() -> Result<()> {
        let s = Series::new("v".into(), vec![Some(5.0), None, Some(15.0)]);
        let df = DataFrame::new(vec![Column::from(s)])?;

        let (filled, affected) = fill_missing_numeric(&df)?;
        assert_eq!(affected, vec!["v".to_owned()]);

        // Mean of 5 and 15 is 10; the column mean is unchanged by the fill.
        let v = filled.column("v")?.as_materialized_series();
        assert_eq!(v.null_count(), 0);
        let ca = v.f64()?;
        assert_eq!(ca.get(0), Some(5.0));
        assert_eq!(ca.get(1), Some(10.0));
        assert_eq!(ca.get(2), Some(15.0));
        assert_eq!(v.mean(), Some(10.0));
        Ok(())
    }

    #[test]
    fn test_fill_missing_numeric_per_column_independence() -> Result<()> {
        let s1 = Series::new("x".into(), vec![Some(1.0), None, Some(3.0)]);
        let s2 = Series::new("y".into(), vec![Some(10.0), Some(20.0), None]);
        let df = DataFrame::new(vec![Column::from(s1), Column::from(s2)])?;

        let (filled, affected) = fill_missing_numeric(&df)?;
        assert_eq!(affected, vec!["x".to_owned(), "y".to_owned()]);

        assert_eq!(filled.column("x")?.as_materialized_series().f64()?.get(1), Some(2.0));
        assert_eq!(filled.column("y")?.as_materialized_series().f64()?.get(2), Some(15.0));
        Ok(())
    }

    #[test]
    fn test_fill_missing_promotes_integers_to_float() -> Result<()> {
        let s = Series::new("n".into(), vec![Some(5i64), None, Some(16)]);
        let df = DataFrame::new(vec![Column::from(s)])?;

        let (filled, affected) = fill_missing_numeric(&df)?;
        assert_eq!(affected.len(), 1);

        let n = filled.column("n")?.as_materialized_series();
        assert_eq!(*n.dtype(), DataType::Float64);
        assert_eq!(n.f64()?.get(1), Some(10.5));
        Ok(())
    }

    #[test]
    fn test_fill_missing_skips_all_null_and_text_columns() -> Result<()> {
        let s1 = Series::new("empty".into(), vec![None::<f64>, None, None]);
        let s2 = Series::new("label".into(), vec![Some("a"), None, Some("c")]);
        let s3 = Series::new("ok".into(), vec![Some(1.0), Some(2.0), Some(3.0)]);
        let df = DataFrame::new(vec![Column::from(s1), Column::from(s2), Column::from(s3)])?;

        let (filled, affected) = fill_missing_numeric(&df)?;
        assert!(affected.is_empty());

        // All-null mean is undefined, text is out of scope, full columns
        // have nothing to fill; the table comes back unchanged.
        assert!(filled.equals_missing(&df));
        Ok(())
    }

    #[test]
    fn test_cleaning_report_summary() {
        let report = CleaningReport::default();
        assert!(report.is_noop());
        assert_eq!(report.summary(), "nothing to clean");

        let report = CleaningReport {
            duplicates_removed: 1,
            columns_imputed: vec!["a".to_owned(), "b".to_owned()],
        };
        assert_eq!(report.summary(), "removed 1 duplicate row, imputed 2 columns");
    }
}
