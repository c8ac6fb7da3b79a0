//! Field registry: logical field names ↔ sheet columns.

use std::collections::HashMap;

use crate::error::SyncError;
use crate::links::SiteCode;
use crate::models::Field;

/// Static mapping between fields and 1-based column positions.
///
/// Built once from the configured layout and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    columns: Vec<Field>,
    positions: HashMap<Field, usize>,
}

impl FieldRegistry {
    /// Builds a registry from an ordered list of fields.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidLayout`] if a field appears twice or the
    /// layout lacks an `ID` column.
    pub fn new(columns: Vec<Field>) -> Result<Self, SyncError> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (index, field) in columns.iter().enumerate() {
            if positions.insert(*field, index + 1).is_some() {
                return Err(SyncError::InvalidLayout(format!(
                    "field '{field}' appears more than once"
                )));
            }
        }
        if !positions.contains_key(&Field::Id) {
            return Err(SyncError::InvalidLayout("layout has no 'ID' column".to_string()));
        }
        Ok(Self { columns, positions })
    }

    /// Builds a registry from configured column names.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FieldNotFound`] for an unrecognized name, or any
    /// error of [`FieldRegistry::new`].
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SyncError> {
        let columns = names
            .iter()
            .map(|name| name.as_ref().parse::<Field>().map_err(SyncError::field_not_found))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// Every base field followed by one column per site.
    #[must_use]
    pub fn default_columns() -> Vec<Field> {
        Field::BASE
            .iter()
            .copied()
            .chain(SiteCode::ALL.iter().copied().map(Field::Site))
            .collect()
    }

    /// Resolves a field name to its column position.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FieldNotFound`] if the name is not a recognized
    /// field or the field has no column in this layout.
    pub fn resolve(&self, name: &str) -> Result<usize, SyncError> {
        let field = name.parse::<Field>().map_err(SyncError::field_not_found)?;
        self.position(field)
            .ok_or_else(|| SyncError::field_not_found(field.name()))
    }

    #[must_use]
    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    /// Field stored in the 1-based column `position`.
    pub fn field_at(&self, position: usize) -> Result<Field, SyncError> {
        position
            .checked_sub(1)
            .and_then(|index| self.columns.get(index))
            .copied()
            .ok_or(SyncError::PositionNotFound(position))
    }

    pub fn fields(&self) -> impl Iterator<Item = (usize, Field)> + '_ {
        self.columns.iter().copied().enumerate().map(|(i, f)| (i + 1, f))
    }

    /// A1-style address of `field` on sheet row `row_number`.
    #[must_use]
    pub fn address(&self, field: Field, row_number: usize) -> Option<String> {
        self.position(field)
            .map(|position| format!("{}{row_number}", position_to_letter(position)))
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new(Self::default_columns()).expect("default layout is valid")
    }
}

/// Converts a 1-based column position to its letter label (`1 → A`, `27 → AA`).
///
/// Position 0 has no label and yields an empty string.
#[must_use]
pub fn position_to_letter(position: usize) -> String {
    let mut remaining = position;
    let mut letters = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(position_to_letter(1), "A");
        assert_eq!(position_to_letter(26), "Z");
        assert_eq!(position_to_letter(27), "AA");
        assert_eq!(position_to_letter(52), "AZ");
        assert_eq!(position_to_letter(53), "BA");
        assert_eq!(position_to_letter(702), "ZZ");
        assert_eq!(position_to_letter(703), "AAA");
        assert_eq!(position_to_letter(0), "");
    }

    #[test]
    fn resolve_known_and_unknown() {
        let registry = FieldRegistry::default();
        assert_eq!(registry.resolve("ID").unwrap(), 1);
        assert_eq!(registry.resolve("current episode").unwrap(), 13);
        assert!(matches!(
            registry.resolve("Episodes Seen"),
            Err(SyncError::FieldNotFound(name)) if name == "Episodes Seen"
        ));
    }

    #[test]
    fn resolve_field_missing_from_layout() {
        let registry = FieldRegistry::from_names(&["ID", "Title", "Status"]).unwrap();
        assert!(matches!(
            registry.resolve("Poster"),
            Err(SyncError::FieldNotFound(_))
        ));
        assert_eq!(registry.field_at(3).unwrap(), Field::Status);
        assert!(matches!(registry.field_at(0), Err(SyncError::PositionNotFound(0))));
        assert!(registry.field_at(4).is_err());
    }

    #[test]
    fn layout_validation() {
        assert!(matches!(
            FieldRegistry::from_names(&["ID", "Title", "title"]),
            Err(SyncError::InvalidLayout(_))
        ));
        assert!(matches!(
            FieldRegistry::from_names(&["Title"]),
            Err(SyncError::InvalidLayout(_))
        ));
        assert!(matches!(
            FieldRegistry::from_names(&["ID", "Bogus"]),
            Err(SyncError::FieldNotFound(_))
        ));
    }

    #[test]
    fn addresses_use_letters() {
        let registry = FieldRegistry::default();
        assert_eq!(registry.address(Field::Id, 2).as_deref(), Some("A2"));
        assert_eq!(registry.address(Field::Status, 10).as_deref(), Some("L10"));
        let sites_start = Field::BASE.len() + 1;
        assert_eq!(
            registry.address(Field::Site(SiteCode::AniDb), 3),
            Some(format!("{}3", position_to_letter(sites_start)))
        );
    }
}
