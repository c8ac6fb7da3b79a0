//! Payloads consumed by the metadata mapper.
//!
//! The primary payload follows the Jikan `GET /anime/{id}` shape; the
//! cross-reference payload follows `AnimeAPI`'s flat site-name → id object.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::SyncError;

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryPayload {
    pub data: AnimeData,
}

impl PrimaryPayload {
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnimeData {
    pub mal_id: Option<u64>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub source: Option<String>,
    pub episodes: Option<u64>,
    /// Kept loose: some mirrors send strings here.
    pub airing: Option<Value>,
    pub synopsis: Option<String>,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub rating: Option<String>,
    pub score: Option<f64>,
    pub images: Option<Images>,
    pub aired: Option<Aired>,
}

impl AnimeData {
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|i| i.jpg.as_ref())
            .and_then(|jpg| jpg.large_image_url.as_deref().or(jpg.image_url.as_deref()))
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn aired_from(&self) -> Option<&str> {
        self.aired
            .as_ref()
            .and_then(|a| a.from.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Images {
    pub jpg: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Aired {
    pub from: Option<String>,
}

/// Foreign identifiers of one entry on other cataloguing sites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CrossReference(BTreeMap<String, Value>);

impl CrossReference {
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The id stored under `key`, rendered as text.
    ///
    /// Null, `false`, zero and empty strings count as absent.
    #[must_use]
    pub fn foreign_id(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Path of the entry on the episodic site (`shows/{id}/seasons/{n}` when a
    /// season is known, else `{type}/{id}`).
    #[must_use]
    pub fn trakt_path(&self) -> Option<String> {
        let id = self.foreign_id("trakt")?;
        if let Some(season) = self.foreign_id("trakt_season") {
            return Some(format!("shows/{id}/seasons/{season}"));
        }
        let kind = self.foreign_id("trakt_type").unwrap_or_else(|| "shows".to_string());
        Some(format!("{kind}/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_payload_tolerates_missing_keys() {
        let payload = PrimaryPayload::parse(r#"{"data": {"episodes": 37, "type": "TV"}}"#).unwrap();
        assert_eq!(payload.data.episodes, Some(37));
        assert_eq!(payload.data.media_type.as_deref(), Some("TV"));
        assert!(payload.data.poster_url().is_none());
        assert!(payload.data.aired_from().is_none());
    }

    #[test]
    fn primary_payload_requires_data() {
        assert!(PrimaryPayload::parse(r#"{"status": 404}"#).is_err());
        assert!(PrimaryPayload::parse("<html>").is_err());
    }

    #[test]
    fn poster_prefers_large_image() {
        let payload = PrimaryPayload::parse(
            r#"{"data": {"images": {"jpg": {"image_url": "s.jpg", "large_image_url": "l.jpg"}}}}"#,
        )
        .unwrap();
        assert_eq!(payload.data.poster_url(), Some("l.jpg"));
    }

    #[test]
    fn foreign_id_handles_numbers_and_strings() {
        let xref = CrossReference::parse(
            r#"{"anilist": 1535, "animeplanet": "death-note", "kitsu": null, "kaize": "", "annict": 0}"#,
        )
        .unwrap();
        assert_eq!(xref.foreign_id("anilist").as_deref(), Some("1535"));
        assert_eq!(xref.foreign_id("animeplanet").as_deref(), Some("death-note"));
        assert_eq!(xref.foreign_id("kitsu"), None);
        assert_eq!(xref.foreign_id("kaize"), None);
        assert_eq!(xref.foreign_id("annict"), None);
        assert_eq!(xref.foreign_id("missing"), None);
    }

    #[test]
    fn trakt_path_variants() {
        let season = CrossReference::parse(r#"{"trakt": 1234, "trakt_type": "shows", "trakt_season": 2}"#).unwrap();
        assert_eq!(season.trakt_path().as_deref(), Some("shows/1234/seasons/2"));

        let movie = CrossReference::parse(r#"{"trakt": 99, "trakt_type": "movies"}"#).unwrap();
        assert_eq!(movie.trakt_path().as_deref(), Some("movies/99"));

        let none = CrossReference::parse(r#"{"trakt": null}"#).unwrap();
        assert_eq!(none.trakt_path(), None);
    }
}
