//! Session-scoped ownership of uploaded files and their derived tables.
//!
//! The session object is passed explicitly to every handler; there are no
//! ambient globals. An entry is created on the first successful parse of a
//! file, mutated in place by cleaning and selection dispatch, and discarded
//! when the session ends or the file is replaced. Repeated interactions
//! therefore compose on the latest table, not on the originally uploaded
//! data.

use crate::error::{Result, SweeperError};
use crate::loader::{self, UploadedFile};
use polars::prelude::DataFrame;
use std::collections::HashMap;

/// Pipeline position of a session entry. Stages only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Loaded,
    Cleaned,
    ColumnsSelected,
    Visualized,
    Exported,
}

/// One uploaded file together with its current derived table.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub file: UploadedFile,
    pub table: DataFrame,
    pub stage: Stage,
}

impl SessionEntry {
    /// Advance the pipeline stage; stages never move backwards.
    pub fn advance(&mut self, stage: Stage) {
        if stage > self.stage {
            self.stage = stage;
        }
    }
}

/// Holder of the current table per uploaded file name, for one interactive
/// session.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: HashMap<String, SessionEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `file`, parsing it on first access.
    ///
    /// Re-opening the same name with identical bytes resumes the existing
    /// entry, keeping the derived table; different bytes mean the file was
    /// replaced, so the entry is rebuilt from a fresh parse.
    pub fn open(&mut self, file: UploadedFile) -> Result<&mut SessionEntry> {
        let name = file.name().to_owned();
        let resume = self
            .entries
            .get(&name)
            .is_some_and(|e| e.file.bytes() == file.bytes());

        if !resume {
            let table = loader::load_table(file.bytes(), file.format())?;
            tracing::info!(
                rows = table.height(),
                columns = table.width(),
                "loaded table from {name}"
            );
            self.entries.insert(
                name.clone(),
                SessionEntry {
                    file,
                    table,
                    stage: Stage::Loaded,
                },
            );
        }

        self.entries
            .get_mut(&name)
            .ok_or_else(|| SweeperError::Session(format!("no open file named {name}")))
    }

    pub fn get(&self, name: &str) -> Option<&SessionEntry> {
        self.entries.get(name)
    }

    /// Mutable access for action dispatch; the file must have been opened.
    pub fn entry_mut(&mut self, name: &str) -> Result<&mut SessionEntry> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| SweeperError::Session(format!("no open file named {name}")))
    }

    /// Discard one entry (its slot was replaced or abandoned).
    pub fn close(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Session teardown: discard every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, csv: &[u8]) -> UploadedFile {
        UploadedFile::new(name, csv.to_vec()).expect("supported extension")
    }

    #[test]
    fn test_first_open_parses_the_upload() -> Result<()> {
        let mut state = SessionState::new();
        let entry = state.open(upload("t.csv", b"a,b\n1,2\n"))?;

        assert_eq!(entry.stage, Stage::Loaded);
        assert_eq!(entry.table.height(), 1);
        assert_eq!(state.len(), 1);
        Ok(())
    }

    #[test]
    fn test_reopen_with_same_bytes_keeps_derived_table() -> Result<()> {
        let mut state = SessionState::new();
        let csv = b"a\n1\n2\n";

        {
            let entry = state.open(upload("t.csv", csv))?;
            // Simulate a transform having replaced the table.
            entry.table = entry.table.head(Some(1));
            entry.advance(Stage::Cleaned);
        }

        let entry = state.open(upload("t.csv", csv))?;
        assert_eq!(entry.table.height(), 1);
        assert_eq!(entry.stage, Stage::Cleaned);
        Ok(())
    }

    #[test]
    fn test_reopen_with_new_bytes_replaces_entry() -> Result<()> {
        let mut state = SessionState::new();
        state.open(upload("t.csv", b"a\n1\n"))?;

        let entry = state.open(upload("t.csv", b"a\n1\n2\n3\n"))?;
        assert_eq!(entry.table.height(), 3);
        assert_eq!(entry.stage, Stage::Loaded);
        assert_eq!(state.len(), 1);
        Ok(())
    }

    #[test]
    fn test_stage_never_moves_backwards() -> Result<()> {
        let mut state = SessionState::new();
        let entry = state.open(upload("t.csv", b"a\n1\n"))?;

        entry.advance(Stage::ColumnsSelected);
        entry.advance(Stage::Cleaned);
        assert_eq!(entry.stage, Stage::ColumnsSelected);
        Ok(())
    }

    #[test]
    fn test_teardown() -> Result<()> {
        let mut state = SessionState::new();
        state.open(upload("a.csv", b"x\n1\n"))?;
        state.open(upload("b.csv", b"y\n2\n"))?;

        assert!(state.close("a.csv"));
        assert!(!state.close("a.csv"));
        assert!(state.entry_mut("a.csv").is_err());

        state.clear();
        assert!(state.is_empty());
        Ok(())
    }
}
