//! File-backed stand-in for the host spreadsheet.
//!
//! Rows are indexed from zero here; [`SheetStore::row_number`] maps an index
//! to the sheet row number used in A1 addresses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::sheet::MAX_ROWS;
use crate::models::Row;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Sheet {
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// The row at `index`, growing the sheet with empty rows as needed.
    ///
    /// Fails for indexes at or beyond [`MAX_ROWS`].
    pub fn row_mut(&mut self, index: usize) -> Result<&mut Row> {
        if index >= MAX_ROWS {
            anyhow::bail!("Row index {index} is beyond the sheet limit of {MAX_ROWS} rows");
        }
        if index >= self.rows.len() {
            self.rows.resize_with(index + 1, Row::default);
        }
        Ok(&mut self.rows[index])
    }

    /// Swaps in a new state for the row at `index`.
    pub fn replace(&mut self, index: usize, row: Row) -> Result<Row> {
        Ok(std::mem::replace(self.row_mut(index)?, row))
    }
}

pub struct SheetStore {
    path: PathBuf,
    first_data_row: usize,
}

impl SheetStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, first_data_row: usize) -> Self {
        Self {
            path: path.into(),
            first_data_row,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet row number of the row at `index`.
    #[must_use]
    pub const fn row_number(&self, index: usize) -> usize {
        self.first_data_row + index
    }

    /// Index of the row at sheet row number `row_number`, if it is a data row.
    #[must_use]
    pub const fn index_of(&self, row_number: usize) -> Option<usize> {
        row_number.checked_sub(self.first_data_row)
    }

    pub fn load(&self) -> Result<Sheet> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Sheet file missing, starting empty");
            return Ok(Sheet::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sheet file: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sheet file: {}", self.path.display()))
    }

    pub fn save(&self, sheet: &Sheet) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(sheet)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write sheet file: {}", self.path.display()))?;
        info!(path = %self.path.display(), rows = sheet.rows.len(), "Sheet saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Field};

    fn temp_store() -> SheetStore {
        let path = std::env::temp_dir()
            .join(format!("anisheet-sheet-{}", uuid::Uuid::new_v4()))
            .join("sheet.json");
        SheetStore::new(path, 2)
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = temp_store();
        assert_eq!(store.load().unwrap(), Sheet::default());
    }

    #[test]
    fn rows_grow_on_demand() {
        let mut sheet = Sheet::default();
        sheet.row_mut(3).unwrap().set(Field::Id, CellValue::Integer(1));
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.row(0), Some(&Row::default()));
        assert_eq!(sheet.row(3).and_then(Row::external_id).map(|id| id.value()), Some(1));
    }

    #[test]
    fn rows_past_the_limit_are_rejected() {
        let mut sheet = Sheet::default();
        assert!(sheet.row_mut(usize::MAX - 2).is_err());
        assert!(sheet.row_mut(MAX_ROWS).is_err());
        assert!(sheet.replace(MAX_ROWS, Row::default()).is_err());
        assert!(sheet.rows.is_empty());

        assert!(sheet.row_mut(MAX_ROWS - 1).is_ok());
        assert_eq!(sheet.rows.len(), MAX_ROWS);
    }

    #[test]
    fn save_then_load() {
        let store = temp_store();
        let mut sheet = Sheet::default();
        sheet.row_mut(1).unwrap().set(Field::Title, CellValue::formula("=\"x\""));
        store.save(&sheet).unwrap();

        assert_eq!(store.load().unwrap(), sheet);
        let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[test]
    fn row_numbers_offset_by_header() {
        let store = temp_store();
        assert_eq!(store.row_number(0), 2);
        assert_eq!(store.index_of(5), Some(3));
        assert_eq!(store.index_of(1), None);
    }
}
