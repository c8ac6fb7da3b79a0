//! Maps fetched metadata payloads onto row fields.
//!
//! Missing or falsy payload keys leave their field untouched. A malformed
//! payload or air date is logged and skipped; the rest of the mapping still
//! runs.

use chrono::{DateTime, Datelike, NaiveDate};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::formula::{self, TitleVariants};
use super::synchronizer::Transition;
use crate::config::Config;
use crate::domain::WatchStatus;
use crate::links::SiteCode;
use crate::models::metadata::AnimeData;
use crate::models::{CellValue, CrossReference, Field, PrimaryPayload};

pub struct MetadataMapper<'a> {
    config: &'a Config,
}

impl<'a> MetadataMapper<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    #[instrument(skip_all)]
    pub fn map(&self, tx: &mut Transition, primary_raw: &str, cross_reference_raw: &str) {
        store_payload(tx, Field::Metadata, primary_raw);
        store_payload(tx, Field::CrossReference, cross_reference_raw);

        let cross_reference = if cross_reference_raw.trim().is_empty() {
            CrossReference::default()
        } else {
            CrossReference::parse(cross_reference_raw).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed cross-reference payload");
                CrossReference::default()
            })
        };

        let mut romaji = None;
        if primary_raw.trim().is_empty() {
            debug!("No primary payload");
        } else {
            match PrimaryPayload::parse(primary_raw) {
                Ok(payload) => {
                    self.map_primary(tx, &payload.data, &cross_reference);
                    romaji = payload.data.title;
                }
                Err(e) => warn!(error = %e, "Ignoring malformed primary metadata payload"),
            }
        }

        self.map_sites(tx, &cross_reference, romaji.as_deref());
        initialize_tracking(tx);
    }

    fn map_primary(&self, tx: &mut Transition, data: &AnimeData, cross_reference: &CrossReference) {
        if let Some(media_type) = truthy(data.media_type.as_deref()) {
            tx.set(Field::MediaType, CellValue::text(media_type));
        }
        if let Some(source) = truthy(data.source.as_deref()) {
            tx.set(Field::Source, CellValue::text(source));
        }
        if let Some(episodes) = data.episodes.filter(|n| *n > 0) {
            tx.set(Field::TotalEpisodes, CellValue::Integer(episodes));
            tx.clamp_current_episode();
        }
        if let Some(score) = data.score.filter(|s| *s > 0.0) {
            tx.set(Field::Score, CellValue::Number(score));
        }

        match &data.airing {
            Some(Value::Bool(airing)) => tx.set(Field::Airing, CellValue::Flag(*airing)),
            Some(other) => debug!(value = %other, "Skipping non-boolean airing flag"),
            None => {}
        }

        self.map_title(tx, data, cross_reference);

        if let Some(synopsis) = truthy(data.synopsis.as_deref()) {
            tx.note(Field::Title, Some(synopsis.to_string()));
        }

        if let Some(raw) = data.aired_from() {
            match parse_air_date(raw) {
                Some(date) => {
                    tx.set(Field::Aired, CellValue::Date(date));
                    tx.set(Field::Year, CellValue::Integer(u64::try_from(date.year()).unwrap_or(0)));
                }
                None => {
                    warn!(value = %raw, "Could not parse air date, clearing it");
                    tx.clear(Field::Aired);
                }
            }
        }

        if let Some(rating) = truthy(data.rating.as_deref()).and_then(|r| r.split_whitespace().next()) {
            tx.set(Field::Rating, CellValue::text(rating));
        }

        if let Some(url) = data.poster_url() {
            tx.set(Field::Poster, CellValue::formula(formula::poster(url)));
        }
    }

    fn map_title(&self, tx: &mut Transition, data: &AnimeData, cross_reference: &CrossReference) {
        let titles = TitleVariants {
            native: data.title_japanese.clone().unwrap_or_default(),
            english: data.title_english.clone().unwrap_or_default(),
            romaji: data.title.clone().unwrap_or_default(),
        };
        if titles == TitleVariants::default() {
            debug!("Payload carries no titles, keeping placeholder");
            return;
        }

        let own_id = tx
            .row
            .external_id()
            .map(|id| id.to_string())
            .or_else(|| data.mal_id.map(|id| id.to_string()))
            .unwrap_or_default();
        let fallback = SiteCode::MyAnimeList.link(&own_id, None);

        let links: Vec<String> = SiteCode::TITLE_LINK_TARGETS
            .iter()
            .map(|site| match site {
                SiteCode::MyAnimeList => fallback.clone(),
                SiteCode::Shikimori => SiteCode::Shikimori.link(&own_id, None),
                other => cross_reference
                    .foreign_id(other.long_key())
                    .map_or_else(|| fallback.clone(), |id| other.link(&id, Some(&titles.romaji))),
            })
            .collect();

        let settings = &self.config.title;
        tx.set(
            Field::Title,
            CellValue::formula(formula::title(
                &titles,
                &links,
                &settings.language_cell,
                &settings.link_site_cell,
            )),
        );
    }

    fn map_sites(&self, tx: &mut Transition, cross_reference: &CrossReference, title: Option<&str>) {
        for site in &self.config.layout.sites {
            if site.is_primary_driven() {
                continue;
            }
            let foreign_id = match site {
                SiteCode::Trakt => cross_reference.trakt_path(),
                other => cross_reference.foreign_id(other.long_key()),
            };
            if let Some(id) = foreign_id {
                tx.set(Field::Site(*site), CellValue::text(site.link(&id, title)));
            }
        }
    }
}

fn truthy(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn store_payload(tx: &mut Transition, field: Field, raw: &str) {
    if !raw.trim().is_empty() {
        tx.set(field, CellValue::text(raw));
    }
}

/// A fresh row starts out planned with no repeats.
fn initialize_tracking(tx: &mut Transition) {
    if tx.row.value(Field::Status).is_empty() {
        tx.set_status(WatchStatus::Planned);
    }
    if tx.row.value(Field::Repeat).is_empty() {
        tx.set(Field::Repeat, CellValue::Integer(0));
    }
}

fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    const DEATH_NOTE: &str = r#"{
        "data": {
            "mal_id": 1535,
            "type": "TV",
            "source": "Manga",
            "episodes": 37,
            "airing": false,
            "synopsis": "A shinigami drops a notebook.",
            "title": "Death Note",
            "title_english": "Death Note",
            "title_japanese": "デスノート",
            "rating": "R - 17+ (violence & profanity)",
            "score": 8.62,
            "images": {"jpg": {"large_image_url": "https://cdn.myanimelist.net/images/anime/9/9453l.jpg"}},
            "aired": {"from": "2006-10-04T00:00:00+00:00"}
        }
    }"#;

    const DEATH_NOTE_XREF: &str = r#"{
        "anidb": 4563,
        "anilist": 1535,
        "animeplanet": "death-note",
        "kitsu": 1376,
        "simkl": 40028,
        "shikimori": 1535,
        "trakt": 1234,
        "trakt_type": "shows",
        "trakt_season": 1,
        "livechart": null
    }"#;

    fn mapped(row: Row, primary: &str, xref: &str) -> Transition {
        let config = Config::default();
        let mut tx = Transition::new(row);
        MetadataMapper::new(&config).map(&mut tx, primary, xref);
        tx
    }

    fn base_row() -> Row {
        Row::new().with(Field::Id, CellValue::Integer(1535))
    }

    #[test]
    fn maps_literal_fields() {
        let tx = mapped(base_row(), DEATH_NOTE, DEATH_NOTE_XREF);
        let row = &tx.row;
        assert_eq!(row.value(Field::MediaType), &CellValue::text("TV"));
        assert_eq!(row.value(Field::Source), &CellValue::text("Manga"));
        assert_eq!(row.total_episodes(), Some(37));
        assert_eq!(row.value(Field::Airing), &CellValue::Flag(false));
        assert_eq!(row.value(Field::Rating), &CellValue::text("R"));
        assert_eq!(row.value(Field::Score), &CellValue::Number(8.62));
        assert_eq!(row.note(Field::Title), Some("A shinigami drops a notebook."));
        assert_eq!(
            row.date(Field::Aired),
            NaiveDate::from_ymd_opt(2006, 10, 4)
        );
        assert_eq!(row.value(Field::Year), &CellValue::Integer(2006));
    }

    #[test]
    fn maps_title_and_poster_formulas() {
        let tx = mapped(base_row(), DEATH_NOTE, DEATH_NOTE_XREF);
        let CellValue::Formula(title) = tx.row.value(Field::Title) else {
            panic!("title should be a formula");
        };
        assert!(title.contains("\"デスノート\", \"Death Note\", \"Death Note\""));
        assert!(title.contains("\"https://myanimelist.net/anime/1535\""));
        assert!(title.contains("\"https://anilist.co/anime/1535\""));
        assert!(title.contains("\"https://kitsu.app/anime/1376\""));
        assert!(title.contains("\"https://shikimori.one/animes/1535\""));
        assert!(title.contains("\"https://simkl.com/anime/40028/death-note\""));

        assert_eq!(
            tx.row.value(Field::Poster),
            &CellValue::formula(formula::poster(
                "https://cdn.myanimelist.net/images/anime/9/9453l.jpg"
            ))
        );
    }

    #[test]
    fn maps_cross_reference_sites() {
        let tx = mapped(base_row(), DEATH_NOTE, DEATH_NOTE_XREF);
        let site = |code| tx.row.value(Field::Site(code)).clone();

        assert_eq!(site(SiteCode::AniDb), CellValue::text("https://anidb.net/anime/4563"));
        assert_eq!(
            site(SiteCode::AnimePlanet),
            CellValue::text("https://www.anime-planet.com/anime/death-note")
        );
        assert_eq!(
            site(SiteCode::Trakt),
            CellValue::text("https://trakt.tv/shows/1234/seasons/1")
        );
        assert_eq!(site(SiteCode::LiveChart), CellValue::Empty);
        // Driven by the row's own ID, never by the payload.
        assert_eq!(site(SiteCode::Simkl), CellValue::Empty);
        assert_eq!(site(SiteCode::Shikimori), CellValue::Empty);
        assert_eq!(site(SiteCode::MyAnimeList), CellValue::Empty);
    }

    #[test]
    fn only_configured_sites_are_written() {
        let mut config = Config::default();
        config.layout.sites = vec![SiteCode::Kitsu];
        let mut tx = Transition::new(base_row());
        MetadataMapper::new(&config).map(&mut tx, DEATH_NOTE, DEATH_NOTE_XREF);
        assert!(tx.written(Field::Site(SiteCode::Kitsu)));
        assert!(!tx.written(Field::Site(SiteCode::AniDb)));
    }

    #[test]
    fn falsy_keys_leave_fields_untouched() {
        let row = base_row()
            .with(Field::MediaType, CellValue::text("Movie"))
            .with(Field::TotalEpisodes, CellValue::Integer(1));
        let tx = mapped(
            row,
            r#"{"data": {"type": "", "episodes": null, "source": null}}"#,
            "{}",
        );
        assert_eq!(tx.row.value(Field::MediaType), &CellValue::text("Movie"));
        assert_eq!(tx.row.total_episodes(), Some(1));
        assert!(!tx.written(Field::Airing));
    }

    #[test]
    fn bad_air_date_clears_field_and_continues() {
        let row = base_row().with(
            Field::Aired,
            CellValue::Date(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()),
        );
        let tx = mapped(
            row,
            r#"{"data": {"aired": {"from": "sometime in 2006"}, "rating": "PG-13 - Teens 13 or older"}}"#,
            "{}",
        );
        assert_eq!(tx.row.value(Field::Aired), &CellValue::Empty);
        assert_eq!(tx.row.value(Field::Rating), &CellValue::text("PG-13"));
    }

    #[test]
    fn date_only_air_date_is_accepted() {
        assert_eq!(
            parse_air_date("2009-04-05"),
            NaiveDate::from_ymd_opt(2009, 4, 5)
        );
        assert_eq!(parse_air_date("2009"), None);
    }

    #[test]
    fn malformed_payloads_do_not_abort() {
        let tx = mapped(base_row(), "not json", r#"{"kitsu": 1376}"#);
        assert_eq!(
            tx.row.value(Field::Site(SiteCode::Kitsu)),
            &CellValue::text("https://kitsu.app/anime/1376")
        );
        assert_eq!(tx.row.status(), Some(WatchStatus::Planned));
    }

    #[test]
    fn non_boolean_airing_is_skipped() {
        let tx = mapped(base_row(), r#"{"data": {"airing": "yes"}}"#, "{}");
        assert!(!tx.written(Field::Airing));
    }

    #[test]
    fn smaller_total_clamps_current_episode() {
        let row = base_row().with(Field::CurrentEpisode, CellValue::Integer(40));
        let tx = mapped(row, DEATH_NOTE, "{}");
        assert_eq!(tx.row.total_episodes(), Some(37));
        assert_eq!(tx.row.current_episode(), Some(37));
    }

    #[test]
    fn fresh_row_is_planned_with_no_repeats() {
        let tx = mapped(base_row(), r#"{"data": {"episodes": 37}}"#, "{}");
        assert_eq!(tx.row.status(), Some(WatchStatus::Planned));
        assert_eq!(tx.row.repeat_count(), Some(0));

        let existing = base_row()
            .with(Field::Status, CellValue::text("Current"))
            .with(Field::Repeat, CellValue::Integer(2));
        let tx = mapped(existing, r#"{"data": {"episodes": 37}}"#, "{}");
        assert_eq!(tx.row.status(), Some(WatchStatus::Current));
        assert_eq!(tx.row.repeat_count(), Some(2));
    }
}
