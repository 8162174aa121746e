//! Table export: CSV and Excel byte buffers with download metadata.
//!
//! Both writers target in-memory buffers; the output of an export is a
//! download payload, not a file on disk. The payload owns its bytes so the
//! buffer is released when the download response drops it.

use crate::error::{Result, SweeperError};
use polars::prelude::*;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type for OOXML spreadsheets.
pub const EXCEL_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type for CSV.
pub const CSV_MIME: &str = "text/csv";

/// Target export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    /// Extension for the suggested file name, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    /// Content-type label accompanying the exported bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Excel => EXCEL_MIME,
        }
    }
}

/// A finished export: bytes plus the metadata a download response needs.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    /// Source base name with the extension replaced for the target format.
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Serialize `df` for download, deriving the suggested file name from the
/// uploaded file's name.
///
/// Fails with [`SweeperError::Export`] when the table has no columns; the
/// caller stays on the export step with its state intact.
pub fn export_table(
    df: &DataFrame,
    format: ExportFormat,
    source_name: &str,
) -> Result<ExportPayload> {
    if df.width() == 0 {
        return Err(SweeperError::Export(
            "table has no columns to export".to_owned(),
        ));
    }

    let bytes = match format {
        ExportFormat::Csv => write_csv(df)?,
        ExportFormat::Excel => write_excel(df)?,
    };

    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        bytes = bytes.len(),
        "exported table as {}",
        format.extension()
    );

    Ok(ExportPayload {
        bytes,
        file_name: replace_extension(source_name, format.extension()),
        mime_type: format.mime_type(),
    })
}

/// Header row from column names, no index column, nulls as empty fields.
fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut df = df.clone();
    CsvWriter::new(&mut out)
        .include_header(true)
        .finish(&mut df)?;
    Ok(out)
}

/// Single worksheet, header row from column names, no index column. Numeric
/// columns are written as numbers, booleans as booleans, everything else as
/// strings; nulls are left as blank cells.
fn write_excel(df: &DataFrame) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (idx, name) in df.get_column_names().iter().enumerate() {
        sheet.write_string(0, idx as u16, name.as_str())?;
    }
    for (idx, column) in df.get_columns().iter().enumerate() {
        write_cells(sheet, idx as u16, column.as_materialized_series())?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cells(sheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    if series.dtype().is_numeric() {
        let values = series.cast(&DataType::Float64)?;
        for (row, value) in values.f64()?.into_iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(row as u32 + 1, col, v)?;
            }
        }
    } else if series.dtype().is_bool() {
        for (row, value) in series.bool()?.into_iter().enumerate() {
            if let Some(v) = value {
                sheet.write_boolean(row as u32 + 1, col, v)?;
            }
        }
    } else {
        let values = series.cast(&DataType::String)?;
        for (row, value) in values.str()?.into_iter().enumerate() {
            if let Some(v) = value {
                sheet.write_string(row as u32 + 1, col, v)?;
            }
        }
    }
    Ok(())
}

/// The source base name with its extension replaced, e.g.
/// `report.xlsx` → `report.csv`.
fn replace_extension(name: &str, ext: &str) -> String {
    Path::new(name)
        .with_extension(ext)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("export.{ext}"))
}
