//! Upload ingestion: format detection and parsing of byte streams into tables.
//!
//! CSV goes through the polars reader with schema inference (numeric vs text
//! decided from the leading rows, header row as column names). Excel goes
//! through calamine: first worksheet, first row as header, and a column
//! becomes `Float64` only when every non-empty cell in it is numeric.

use crate::error::{Result, SweeperError};
use calamine::{Data, Reader as _, Xlsx};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Number of leading rows used for CSV schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Supported upload formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// Detect a format from a bare extension (with or without the dot,
    /// case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Excel),
            "" => Err(SweeperError::UnsupportedFormat("(no extension)".to_owned())),
            other => Err(SweeperError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Detect a format from a file name or path.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    /// The canonical extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }
}

/// An uploaded file: name, raw bytes and detected format.
///
/// Immutable once received; rejecting an unsupported extension happens at
/// construction so a batch can skip the file before any parsing work.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
    format: FileFormat,
}

impl UploadedFile {
    /// Wrap received bytes, detecting the format from `name`'s extension.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let format = FileFormat::from_file_name(&name)?;
        Ok(Self {
            name,
            bytes,
            format,
        })
    }

    /// Read a file from disk. The format check runs before the read so
    /// unsupported files are skipped cheaply.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                SweeperError::Other(format!("invalid file name: {}", path.display()))
            })?;
        let format = FileFormat::from_file_name(&name)?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name,
            bytes,
            format,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Size of the uploaded content in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Parse uploaded bytes into a [`DataFrame`] according to the stated format.
///
/// Malformed content fails with [`SweeperError::Parse`].
pub fn load_table(bytes: &[u8], format: FileFormat) -> Result<DataFrame> {
    match format {
        FileFormat::Csv => read_csv(bytes),
        FileFormat::Excel => read_excel(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| SweeperError::Parse(format!("failed to read CSV: {e}")))
}

fn read_excel(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| SweeperError::Parse(format!("failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::Parse("workbook has no worksheets".to_owned()))?
        .map_err(|e| SweeperError::Parse(format!("failed to read worksheet: {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("column_{i}"),
            other => other.to_string(),
        })
        .collect();

    let body: Vec<&[Data]> = rows.collect();
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| build_column(name, idx, &body))
        .collect();

    DataFrame::new(columns)
        .map_err(|e| SweeperError::Parse(format!("invalid worksheet layout: {e}")))
}

/// Build one typed column from the worksheet body. Numeric only when every
/// non-empty cell is numeric; everything else falls back to text with
/// non-string scalars rendered textually. Empty cells become nulls.
fn build_column(name: &str, idx: usize, rows: &[&[Data]]) -> Column {
    let mut any_numeric = false;
    let mut all_numeric = true;
    for row in rows {
        match row.get(idx) {
            None | Some(Data::Empty) => {}
            Some(Data::Float(_)) | Some(Data::Int(_)) => any_numeric = true,
            Some(_) => all_numeric = false,
        }
    }

    if any_numeric && all_numeric {
        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|row| match row.get(idx) {
                Some(Data::Float(f)) => Some(*f),
                Some(Data::Int(i)) => Some(*i as f64),
                _ => None,
            })
            .collect();
        Column::from(Series::new(name.into(), values))
    } else {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| match row.get(idx) {
                None | Some(Data::Empty) => None,
                Some(cell) => Some(cell.to_string()),
            })
            .collect();
        Column::from(Series::new(name.into(), values))
    }
}
