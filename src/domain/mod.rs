//! Domain primitives for tracked rows.
//!
//! Newtypes and closed enumerations shared by the synchronizer, the metadata
//! mapper and the CLI.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External catalogue ID of a tracked entry (a `MyAnimeList` ID).
///
/// # Examples
///
/// ```rust
/// use anisheet::domain::ExternalId;
///
/// let id = ExternalId::new(1535);
/// assert_eq!(id.value(), 1535);
/// assert_eq!(id.to_string(), "1535");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExternalId(u64);

impl ExternalId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ExternalId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl FromStr for ExternalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for ExternalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self)
    }
}

/// Watch status of a row. A row holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchStatus {
    Planned,
    Current,
    Repeating,
    Dropped,
    Holding,
    Finished,
}

impl WatchStatus {
    pub const ALL: &[Self] = &[
        Self::Planned,
        Self::Current,
        Self::Repeating,
        Self::Dropped,
        Self::Holding,
        Self::Finished,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Current => "Current",
            Self::Repeating => "Repeating",
            Self::Dropped => "Dropped",
            Self::Holding => "Holding",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown watch status '{trimmed}'"))
    }
}

/// Title language variant chosen by the display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleLanguage {
    Native,
    English,
    Romaji,
}

impl TitleLanguage {
    /// Order the language setting enumerates the variants in.
    pub const ALL: &[Self] = &[Self::Native, Self::English, Self::Romaji];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::English => "English",
            Self::Romaji => "Romaji",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_parses_trimmed() {
        assert_eq!(" 1535 ".parse::<ExternalId>().unwrap(), ExternalId::new(1535));
        assert!("abc".parse::<ExternalId>().is_err());
    }

    #[test]
    fn external_id_serialization() {
        let id = ExternalId::new(5114);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "5114");
        let back: ExternalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn watch_status_parse_is_case_insensitive() {
        assert_eq!("finished".parse::<WatchStatus>(), Ok(WatchStatus::Finished));
        assert_eq!(" Holding ".parse::<WatchStatus>(), Ok(WatchStatus::Holding));
        assert!("Watching".parse::<WatchStatus>().is_err());
    }
}
