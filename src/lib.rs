//! # Sweeper - Tabular File Cleaning and Conversion
//!
//! Sweeper ingests tabular files (CSV/Excel), cleans them (deduplication,
//! mean imputation), projects them onto a chosen column subset, produces the
//! numeric projection for bar-chart rendering, and exports the result as CSV
//! or Excel bytes with download metadata.
//!
//! The core is a sequential pipeline, `load → clean → select → visualize →
//! export`, coordinated through a [`session::SessionState`] that holds the
//! current table per uploaded file, so repeated interactions compose on the
//! latest state.
//!
//! ## Quick Start
//!
//! ```
//! use sweeper::cleaner;
//! use sweeper::exporter::{export_table, ExportFormat};
//! use sweeper::loader::{load_table, FileFormat};
//!
//! # fn main() -> sweeper::error::Result<()> {
//! let csv = b"name,score\nada,1\nada,1\ngrace,3\n";
//! let table = load_table(csv, FileFormat::Csv)?;
//!
//! let (table, removed) = cleaner::remove_duplicates(&table)?;
//! assert_eq!(removed, 1);
//!
//! let payload = export_table(&table, ExportFormat::Excel, "scores.csv")?;
//! assert_eq!(payload.file_name, "scores.xlsx");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`loader`]: format detection and byte-stream parsing into tables
//! - [`cleaner`]: deduplication and mean-imputation transforms
//! - [`selector`]: column projection in table order
//! - [`chart`]: numeric projection for the hosting layer's bar chart
//! - [`exporter`]: CSV/Excel byte buffers with file name and MIME type
//! - [`session`]: per-file table ownership across interactions
//! - [`orchestrator`]: action dispatch and the whole-file batch pass
//! - [`error`]: error taxonomy and context helpers
//! - [`logging`]: console + rolling-file tracing setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod chart;
pub mod cleaner;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod logging;
pub mod orchestrator;
pub mod selector;
pub mod session;
