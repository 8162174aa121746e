//! Numeric projection feeding the hosting layer's bar-chart capability.
//!
//! This module produces the data for the chart; the rendering call itself
//! belongs to the presentation layer.

use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// One numeric column's series. Nulls are preserved as gaps.
#[derive(Debug, Clone, Serialize)]
pub struct ChartColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Everything a bar chart needs: one series per numeric column, in the
/// table's column order.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub columns: Vec<ChartColumn>,
    pub rows: usize,
}

/// The numeric-only projection of `df`, column order preserved.
pub fn numeric_projection(df: &DataFrame) -> Result<DataFrame> {
    let names: Vec<&str> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_numeric())
        .map(|c| c.name().as_str())
        .collect();
    df.select(names).map_err(Into::into)
}

/// Bar-chart series for `df`'s numeric columns, or `None` when there are
/// none; the caller shows a textual notice in that case.
pub fn bar_chart_data(df: &DataFrame) -> Result<Option<ChartData>> {
    let numeric = numeric_projection(df)?;
    if numeric.width() == 0 {
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(numeric.width());
    for column in numeric.get_columns() {
        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
        columns.push(ChartColumn {
            name: column.name().to_string(),
            values,
        });
    }

    Ok(Some(ChartData {
        columns,
        rows: numeric.height(),
    }))
}
