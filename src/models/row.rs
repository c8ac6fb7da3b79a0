use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell::{Cell, CellChange, CellValue, CellWrite};
use super::field::Field;
use crate::domain::{ExternalId, WatchStatus};

/// One tracked media entry.
///
/// Cells that were never written are absent from the map and read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    cells: BTreeMap<Field, Cell>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: CellValue) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn value(&self, field: Field) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&field).map_or(&EMPTY, |cell| &cell.value)
    }

    #[must_use]
    pub fn note(&self, field: Field) -> Option<&str> {
        self.cells.get(&field).and_then(|cell| cell.note.as_deref())
    }

    pub fn set(&mut self, field: Field, value: CellValue) {
        self.cells.entry(field).or_default().value = value;
        self.prune(field);
    }

    pub fn set_note(&mut self, field: Field, note: Option<String>) {
        self.cells.entry(field).or_default().note = note;
        self.prune(field);
    }

    pub fn apply(&mut self, write: &CellWrite) {
        match &write.change {
            CellChange::Set(value) => self.set(write.field, value.clone()),
            CellChange::Note(note) => self.set_note(write.field, note.clone()),
        }
    }

    /// Fields holding a value or a note.
    pub fn populated_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.cells.keys().copied()
    }

    fn prune(&mut self, field: Field) {
        if self
            .cells
            .get(&field)
            .is_some_and(|cell| cell.value.is_empty() && cell.note.is_none())
        {
            self.cells.remove(&field);
        }
    }

    #[must_use]
    pub fn external_id(&self) -> Option<ExternalId> {
        self.value(Field::Id).as_count().map(ExternalId::new)
    }

    /// Status of the row; unrecognized text reads as no status.
    #[must_use]
    pub fn status(&self) -> Option<WatchStatus> {
        self.value(Field::Status)
            .as_text()
            .and_then(|s| s.parse().ok())
    }

    #[must_use]
    pub fn current_episode(&self) -> Option<u64> {
        self.value(Field::CurrentEpisode).as_count()
    }

    #[must_use]
    pub fn total_episodes(&self) -> Option<u64> {
        self.value(Field::TotalEpisodes).as_count()
    }

    #[must_use]
    pub fn repeat_count(&self) -> Option<u64> {
        self.value(Field::Repeat).as_count()
    }

    #[must_use]
    pub fn date(&self, field: Field) -> Option<NaiveDate> {
        self.value(field).as_date()
    }
}
