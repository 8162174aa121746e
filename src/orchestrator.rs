//! Sequencing of the `load → clean → select → visualize → export` pipeline.
//!
//! Interactive callers dispatch [`Action`]s against a [`SessionState`] and
//! render the returned [`Snapshot`]; the CLI drives whole files through
//! [`sweep_file`] in one synchronous pass. Cleaning and visualization are
//! optional, repeatable branches; column selection always precedes export
//! (defaulting to every column, which is the identity projection); export may
//! be repeated with different formats without re-deriving upstream state.

use crate::chart::{self, ChartData};
use crate::cleaner::{self, CleaningReport};
use crate::error::{Result, SweeperError};
use crate::exporter::{self, ExportFormat, ExportPayload};
use crate::loader::UploadedFile;
use crate::selector;
use crate::session::{SessionEntry, SessionState, Stage};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of preview rows carried in a [`Snapshot`].
const PREVIEW_ROWS: usize = 5;

/// One user interaction against an open file.
#[derive(Debug, Clone)]
pub enum Action {
    RemoveDuplicates,
    FillMissing,
    SelectColumns(Vec<String>),
    Visualize,
    Export(ExportFormat),
}

/// Outcome of a visualize action.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    /// The current table has no numeric columns; the caller shows a textual
    /// notice and no chart is produced.
    NoNumericColumns,
    Ready(ChartData),
}

/// Fresh immutable render state returned after every dispatch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub file_name: String,
    pub file_size: u64,
    pub stage: Stage,
    pub rows: usize,
    pub columns: usize,
    /// Head of the current table.
    pub preview: DataFrame,
    /// `Some(0)` means the action ran and found no duplicates.
    pub duplicates_removed: Option<usize>,
    pub columns_imputed: Option<Vec<String>>,
    pub chart: Option<ChartOutcome>,
    pub export: Option<ExportPayload>,
}

/// Open an uploaded file in the session and return the initial render state.
pub fn open_file(state: &mut SessionState, file: UploadedFile) -> Result<Snapshot> {
    let entry = state.open(file)?;
    Ok(snapshot_of(entry, None, None, None, None))
}

/// Apply one action to an open file, mutating the session entry and
/// returning a fresh snapshot for rendering.
///
/// A failed action (unknown column, empty export) returns the error and
/// leaves the entry exactly as it was.
pub fn dispatch(state: &mut SessionState, file_name: &str, action: Action) -> Result<Snapshot> {
    let entry = state.entry_mut(file_name)?;

    let mut duplicates_removed = None;
    let mut columns_imputed = None;
    let mut chart = None;
    let mut export = None;

    match action {
        Action::RemoveDuplicates => {
            let (table, removed) = cleaner::remove_duplicates(&entry.table)?;
            entry.table = table;
            entry.advance(Stage::Cleaned);
            duplicates_removed = Some(removed);
        }
        Action::FillMissing => {
            let (table, affected) = cleaner::fill_missing_numeric(&entry.table)?;
            entry.table = table;
            entry.advance(Stage::Cleaned);
            columns_imputed = Some(affected);
        }
        Action::SelectColumns(names) => {
            let table = selector::select_columns(&entry.table, &names)?;
            entry.table = table;
            entry.advance(Stage::ColumnsSelected);
        }
        Action::Visualize => {
            chart = Some(match chart::bar_chart_data(&entry.table)? {
                Some(data) => ChartOutcome::Ready(data),
                None => ChartOutcome::NoNumericColumns,
            });
            entry.advance(Stage::Visualized);
        }
        Action::Export(format) => {
            let payload = exporter::export_table(&entry.table, format, entry.file.name())?;
            // Selection structurally precedes export; with no explicit
            // selection the default is every column.
            entry.advance(Stage::ColumnsSelected);
            entry.advance(Stage::Exported);
            export = Some(payload);
        }
    }

    Ok(snapshot_of(
        entry,
        duplicates_removed,
        columns_imputed,
        chart,
        export,
    ))
}

fn snapshot_of(
    entry: &SessionEntry,
    duplicates_removed: Option<usize>,
    columns_imputed: Option<Vec<String>>,
    chart: Option<ChartOutcome>,
    export: Option<ExportPayload>,
) -> Snapshot {
    Snapshot {
        file_name: entry.file.name().to_owned(),
        file_size: entry.file.size(),
        stage: entry.stage,
        rows: entry.table.height(),
        columns: entry.table.width(),
        preview: entry.table.head(Some(PREVIEW_ROWS)),
        duplicates_removed,
        columns_imputed,
        chart,
        export,
    }
}

/// Batch options for a whole-file pass, loadable from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    pub remove_duplicates: bool,
    pub fill_missing: bool,
    /// Columns to keep; `None` keeps all.
    pub columns: Option<Vec<String>>,
    pub chart: bool,
    /// Export target; `None` skips the export step.
    pub format: Option<ExportFormat>,
}

impl SweepOptions {
    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| SweeperError::Config(format!("invalid options file: {e}")))
    }
}

/// Report for one file's batch pass.
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub cleaning: CleaningReport,
    pub chart: Option<ChartOutcome>,
    pub export: Option<ExportPayload>,
}

impl FileOutcome {
    /// One-line summary in before/after form.
    pub fn summary(&self) -> String {
        format!(
            "{}: rows {} ({} → {}), columns {} ({} → {}), {}",
            self.file_name,
            delta_word(self.rows_before, self.rows_after),
            self.rows_before,
            self.rows_after,
            delta_word(self.columns_before, self.columns_after),
            self.columns_before,
            self.columns_after,
            self.cleaning.summary(),
        )
    }
}

fn delta_word(before: usize, after: usize) -> &'static str {
    if after > before {
        "added"
    } else if after < before {
        "removed"
    } else {
        "unchanged"
    }
}

/// Run one file through the whole pipeline in a single synchronous pass:
/// load, optional cleaning, optional selection, optional chart, optional
/// export. Files in a batch are independent; the caller decides whether a
/// failure stops the batch or only this file.
pub fn sweep_file(
    state: &mut SessionState,
    file: UploadedFile,
    options: &SweepOptions,
) -> Result<FileOutcome> {
    let name = file.name().to_owned();
    tracing::info!("sweeping {name}");

    let (rows_before, columns_before) = {
        let entry = state.open(file)?;
        (entry.table.height(), entry.table.width())
    };

    let mut cleaning = CleaningReport::default();
    if options.remove_duplicates {
        let snap = dispatch(state, &name, Action::RemoveDuplicates)?;
        cleaning.duplicates_removed = snap.duplicates_removed.unwrap_or(0);
    }
    if options.fill_missing {
        let snap = dispatch(state, &name, Action::FillMissing)?;
        cleaning.columns_imputed = snap.columns_imputed.unwrap_or_default();
    }
    if let Some(columns) = &options.columns {
        dispatch(state, &name, Action::SelectColumns(columns.clone()))?;
    }

    let chart = if options.chart {
        dispatch(state, &name, Action::Visualize)?.chart
    } else {
        None
    };

    let export = match options.format {
        Some(format) => dispatch(state, &name, Action::Export(format))?.export,
        None => None,
    };

    let entry = state.entry_mut(&name)?;
    let outcome = FileOutcome {
        file_name: name,
        rows_before,
        rows_after: entry.table.height(),
        columns_before,
        columns_after: entry.table.width(),
        cleaning,
        chart,
        export,
    };
    tracing::info!("{}", outcome.summary());
    Ok(outcome)
}
