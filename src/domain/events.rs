//! Events delivered to a row.
//!
//! A [`RowEvent`] is what the host reports; [`EventKind`] is the tagged
//! classification the synchronizer dispatches on, one handler per variant.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::models::Field;
use crate::registry::FieldRegistry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RowEvent {
    /// A user typed `value` into `field`. An empty value means the cell was
    /// cleared.
    Edit { field: Field, value: String },

    /// Both metadata fetches for the row completed.
    MetadataArrived {
        primary: String,
        cross_reference: String,
    },
}

impl RowEvent {
    pub fn edit(field: Field, value: impl Into<String>) -> Self {
        Self::Edit {
            field,
            value: value.into(),
        }
    }

    /// An edit reported by column position, as the host's edit callback does.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PositionNotFound`] if no field occupies `position`.
    pub fn edit_at(
        registry: &FieldRegistry,
        position: usize,
        value: impl Into<String>,
    ) -> Result<Self, SyncError> {
        Ok(Self::edit(registry.field_at(position)?, value))
    }

    /// An edit reported by field name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FieldNotFound`] if the name is not in `registry`.
    pub fn edit_named(
        registry: &FieldRegistry,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let position = registry.resolve(name)?;
        Self::edit_at(registry, position, value)
    }

    #[must_use]
    pub fn kind(&self) -> EventKind<'_> {
        match self {
            Self::Edit { field, value } => {
                let value = value.trim();
                match field {
                    Field::Id if value.is_empty() => EventKind::IdCleared,
                    Field::Id => EventKind::IdAssigned(value),
                    Field::WatchLocation => EventKind::WatchLocation(value),
                    Field::CurrentEpisode => EventKind::EpisodeProgress(value),
                    Field::Status => EventKind::StatusChanged(value),
                    other => EventKind::FieldEdited(*other, value),
                }
            }
            Self::MetadataArrived {
                primary,
                cross_reference,
            } => EventKind::MetadataArrived {
                primary: primary.as_str(),
                cross_reference: cross_reference.as_str(),
            },
        }
    }
}

/// Classification of a [`RowEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind<'a> {
    IdAssigned(&'a str),
    IdCleared,
    WatchLocation(&'a str),
    EpisodeProgress(&'a str),
    StatusChanged(&'a str),
    FieldEdited(Field, &'a str),
    MetadataArrived {
        primary: &'a str,
        cross_reference: &'a str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_id_edits() {
        assert_eq!(RowEvent::edit(Field::Id, " 1535 ").kind(), EventKind::IdAssigned("1535"));
        assert_eq!(RowEvent::edit(Field::Id, "  ").kind(), EventKind::IdCleared);
    }

    #[test]
    fn classifies_other_edits() {
        assert_eq!(
            RowEvent::edit(Field::CurrentEpisode, "4").kind(),
            EventKind::EpisodeProgress("4")
        );
        assert_eq!(
            RowEvent::edit(Field::Story, "8").kind(),
            EventKind::FieldEdited(Field::Story, "8")
        );
    }

    #[test]
    fn edit_by_position_and_name() {
        let registry = FieldRegistry::default();
        let event = RowEvent::edit_named(&registry, "Status", "Dropped").unwrap();
        assert_eq!(event, RowEvent::edit(Field::Status, "Dropped"));
        assert!(matches!(
            RowEvent::edit_named(&registry, "Progress", "1"),
            Err(SyncError::FieldNotFound(_))
        ));
        assert!(matches!(
            RowEvent::edit_at(&registry, 10_000, "1"),
            Err(SyncError::PositionNotFound(10_000))
        ));
    }
}
