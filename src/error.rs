//! Centralized error handling for the sweeper pipeline.
//!
//! The taxonomy follows the recovery boundaries of the pipeline: an
//! [`UnsupportedFormat`](SweeperError::UnsupportedFormat) skips one file while
//! a batch continues, a [`Parse`](SweeperError::Parse) failure stops that file
//! only, and [`UnknownColumn`](SweeperError::UnknownColumn) /
//! [`Export`](SweeperError::Export) reject a single action while the session
//! keeps its prior state. No error terminates the session.
//!
//! Library errors convert into [`SweeperError`] through `From` so the `?`
//! operator works throughout; the [`ResultExt`] trait adds `.context()` for
//! attaching operation-level information.

use std::fmt;

/// Main error type for sweeper operations.
#[derive(Debug)]
pub enum SweeperError {
    /// I/O errors (reading uploads, writing exports)
    Io(std::io::Error),

    /// File extension is neither `.csv` nor `.xlsx`
    UnsupportedFormat(String),

    /// Content was malformed for the stated format
    Parse(String),

    /// A selection referenced a column the table does not have
    UnknownColumn(String),

    /// Export rejected (empty column set) or the workbook writer failed
    Export(String),

    /// Polars failures inside transforms
    DataProcessing(String),

    /// Invalid options/config input
    Config(String),

    /// Dispatch against a file the session has not opened
    Session(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for SweeperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported file type: {ext}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::UnknownColumn(name) => write!(f, "Unknown column: {name}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SweeperError {}

impl From<std::io::Error> for SweeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for SweeperError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<polars::error::PolarsError> for SweeperError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<serde_json::Error> for SweeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<calamine::XlsxError> for SweeperError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SweeperError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, SweeperError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SweeperError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: SweeperError = e.into();
            SweeperError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: SweeperError = e.into();
            SweeperError::Other(format!("{}: {}", f(), err))
        })
    }
}
