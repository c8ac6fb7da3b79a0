use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::field::{Field, FieldKind};
use crate::error::SyncError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The value held by one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(u64),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Formula(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn formula(value: impl Into<String>) -> Self {
        Self::Formula(value.into())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Non-negative whole number held by the cell, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Interprets text typed by a user into `field`.
    ///
    /// Empty input clears the cell. Text beginning with `=` is kept as a
    /// formula regardless of the field kind.
    pub fn parse_input(field: Field, raw: &str) -> Result<Self, SyncError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Empty);
        }
        if trimmed.starts_with('=') {
            return Ok(Self::formula(trimmed));
        }

        match field.kind() {
            FieldKind::Text => Ok(Self::text(trimmed)),
            FieldKind::Count => trimmed
                .parse::<u64>()
                .map(Self::Integer)
                .map_err(|_| SyncError::invalid_value(field, format!("'{trimmed}' is not a whole number"))),
            FieldKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(|| SyncError::invalid_value(field, format!("'{trimmed}' is not a number"))),
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|e| SyncError::invalid_value(field, e.to_string())),
            FieldKind::Timestamp => NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
                .map(Self::Timestamp)
                .map_err(|e| SyncError::invalid_value(field, e.to_string())),
            FieldKind::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Self::Flag(true)),
                "false" | "no" | "0" => Ok(Self::Flag(false)),
                other => Err(SyncError::invalid_value(field, format!("'{other}' is not a boolean"))),
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) | Self::Formula(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// A cell: its value plus an optional note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One change to a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum CellChange {
    Set(CellValue),
    /// Replaces the note; `None` removes it.
    Note(Option<String>),
}

/// A change addressed to a field of the row being synchronized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellWrite {
    pub field: Field,
    pub change: CellChange,
}

impl CellWrite {
    #[must_use]
    pub const fn set(field: Field, value: CellValue) -> Self {
        Self {
            field,
            change: CellChange::Set(value),
        }
    }

    #[must_use]
    pub const fn clear(field: Field) -> Self {
        Self::set(field, CellValue::Empty)
    }

    #[must_use]
    pub const fn note(field: Field, note: Option<String>) -> Self {
        Self {
            field,
            change: CellChange::Note(note),
        }
    }
}
