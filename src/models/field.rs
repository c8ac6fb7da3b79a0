use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::links::SiteCode;

/// A recognized column of the tracking sheet.
///
/// The set is closed: every name the registry accepts maps to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Poster,
    Title,
    MediaType,
    Source,
    Score,
    Rating,
    Year,
    Season,
    Aired,
    Airing,
    Status,
    CurrentEpisode,
    TotalEpisodes,
    StartDate,
    EndDate,
    Repeat,
    WatchLocation,
    Story,
    Characters,
    Acting,
    Visual,
    Theme,
    Sound,
    Percent,
    Estimate,
    CaughtUp,
    Days,
    Marker,
    Weight,
    LastAdded,
    LastUpdated,
    Metadata,
    CrossReference,
    Site(SiteCode),
}

/// What kind of value a field holds when a user types into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Count,
    Number,
    Date,
    Timestamp,
    Flag,
}

impl Field {
    /// Fields with no site column, in default layout order.
    pub const BASE: &[Self] = &[
        Self::Id,
        Self::Poster,
        Self::Title,
        Self::MediaType,
        Self::Source,
        Self::Score,
        Self::Rating,
        Self::Year,
        Self::Season,
        Self::Aired,
        Self::Airing,
        Self::Status,
        Self::CurrentEpisode,
        Self::TotalEpisodes,
        Self::StartDate,
        Self::EndDate,
        Self::Repeat,
        Self::WatchLocation,
        Self::Story,
        Self::Characters,
        Self::Acting,
        Self::Visual,
        Self::Theme,
        Self::Sound,
        Self::Percent,
        Self::Estimate,
        Self::CaughtUp,
        Self::Days,
        Self::Marker,
        Self::Weight,
        Self::LastAdded,
        Self::LastUpdated,
        Self::Metadata,
        Self::CrossReference,
    ];

    /// Fields left untouched when the ID is cleared.
    pub const RETAINED_ON_CLEAR: &[Self] = &[
        Self::Poster,
        Self::Title,
        Self::Season,
        Self::Site(SiteCode::MyAnimeList),
        Self::Site(SiteCode::Shikimori),
        Self::Site(SiteCode::Simkl),
        Self::Percent,
        Self::Estimate,
        Self::CaughtUp,
        Self::Days,
        Self::Marker,
        Self::Weight,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Poster => "Poster",
            Self::Title => "Title",
            Self::MediaType => "Type",
            Self::Source => "Source",
            Self::Score => "Score",
            Self::Rating => "Rating",
            Self::Year => "Year",
            Self::Season => "Season",
            Self::Aired => "Aired",
            Self::Airing => "Airing",
            Self::Status => "Status",
            Self::CurrentEpisode => "Current Episode",
            Self::TotalEpisodes => "Total Episodes",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::Repeat => "Repeat",
            Self::WatchLocation => "Watch Location",
            Self::Story => "Story",
            Self::Characters => "Characters",
            Self::Acting => "Acting",
            Self::Visual => "Visual",
            Self::Theme => "Theme",
            Self::Sound => "Sound",
            Self::Percent => "Percent",
            Self::Estimate => "Estimate",
            Self::CaughtUp => "Caught Up",
            Self::Days => "Days",
            Self::Marker => "Marker",
            Self::Weight => "Weight",
            Self::LastAdded => "Last Added",
            Self::LastUpdated => "Last Updated",
            Self::Metadata => "Metadata",
            Self::CrossReference => "Cross Reference",
            Self::Site(site) => site.code(),
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Id | Self::CurrentEpisode | Self::TotalEpisodes | Self::Repeat | Self::Year => {
                FieldKind::Count
            }
            Self::Score
            | Self::Story
            | Self::Characters
            | Self::Acting
            | Self::Visual
            | Self::Theme
            | Self::Sound => FieldKind::Number,
            Self::Aired | Self::StartDate | Self::EndDate => FieldKind::Date,
            Self::LastAdded | Self::LastUpdated => FieldKind::Timestamp,
            Self::Airing => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }

    #[must_use]
    pub fn is_retained_on_clear(self) -> bool {
        Self::RETAINED_ON_CLEAR.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::BASE
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| trimmed.parse::<SiteCode>().ok().map(Self::Site))
            .ok_or_else(|| trimmed.to_string())
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|name| serde::de::Error::custom(format!("unknown field '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for field in Field::BASE {
            assert_eq!(field.name().parse::<Field>(), Ok(*field));
        }
        for site in SiteCode::ALL {
            assert_eq!(site.code().parse::<Field>(), Ok(Field::Site(*site)));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!("Episodes Watched".parse::<Field>(), Err("Episodes Watched".to_string()));
    }

    #[test]
    fn retained_set_covers_primary_driven_sites() {
        for site in SiteCode::PRIMARY_DRIVEN {
            assert!(Field::Site(*site).is_retained_on_clear());
        }
        assert!(!Field::Site(SiteCode::Anilist).is_retained_on_clear());
        assert!(!Field::Status.is_retained_on_clear());
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Field::CurrentEpisode).unwrap();
        assert_eq!(json, "\"Current Episode\"");
        let site: Field = serde_json::from_str("\"KT\"").unwrap();
        assert_eq!(site, Field::Site(SiteCode::Kitsu));
    }
}
