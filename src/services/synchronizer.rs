//! Row state synchronizer.
//!
//! Turns one [`RowEvent`] and the row it targets into the row's next state
//! plus the ordered cell writes that produce it. Nothing here touches the
//! host sheet; callers apply the writes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::formula;
use super::metadata_mapper::MetadataMapper;
use crate::config::Config;
use crate::constants::formulas::LOADING_TITLE;
use crate::constants::notes::{REWATCH_PREFIX, REWATCH_TIMESTAMP_FORMAT};
use crate::domain::WatchStatus;
use crate::domain::events::{EventKind, RowEvent};
use crate::models::{CellValue, CellWrite, Field, PrimaryPayload, Row};
use crate::parser::extract_external_id;

/// Result of handling one event: the next row and the writes leading to it.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub row: Row,
    pub writes: Vec<CellWrite>,
}

impl Transition {
    #[must_use]
    pub const fn new(row: Row) -> Self {
        Self {
            row,
            writes: Vec::new(),
        }
    }

    /// Records `write` and applies it to the row. Writes that would not
    /// change the row are dropped.
    pub fn write(&mut self, write: CellWrite) {
        let before = self.row.clone();
        self.row.apply(&write);
        if self.row != before {
            self.writes.push(write);
        }
    }

    /// Records `write` even when the row already holds its value, for cells
    /// the host changed behind the row's back.
    pub fn force(&mut self, write: CellWrite) {
        self.row.apply(&write);
        self.writes.push(write);
    }

    pub fn set(&mut self, field: Field, value: CellValue) {
        self.write(CellWrite::set(field, value));
    }

    pub fn clear(&mut self, field: Field) {
        self.write(CellWrite::clear(field));
    }

    pub fn note(&mut self, field: Field, note: Option<String>) {
        self.write(CellWrite::note(field, note));
    }

    /// Sets a date field only when it holds nothing yet.
    pub fn set_date_if_unset(&mut self, field: Field, date: NaiveDate) {
        if self.row.value(field).is_empty() {
            self.set(field, CellValue::Date(date));
        }
    }

    /// Lowers the current episode to a known total it exceeds.
    pub fn clamp_current_episode(&mut self) {
        let Some(total) = self.row.total_episodes().filter(|t| *t > 0) else {
            return;
        };
        if let Some(current) = self.row.current_episode()
            && current > total
        {
            warn!(current, total, "Current episode exceeds new total, clamping");
            self.set(Field::CurrentEpisode, CellValue::Integer(total));
        }
    }

    pub fn set_status(&mut self, status: WatchStatus) {
        self.set(Field::Status, CellValue::text(status.as_str()));
    }

    #[must_use]
    pub fn written(&self, field: Field) -> bool {
        self.writes.iter().any(|w| w.field == field)
    }
}

/// Applies the row transition rules.
pub struct RowSynchronizer {
    config: Config,
}

impl RowSynchronizer {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Handles `event` against `row` as of `now`.
    #[instrument(skip_all, fields(event = ?event.kind()))]
    pub fn apply(&self, row: Row, event: &RowEvent, now: NaiveDateTime) -> Transition {
        let mut tx = Transition::new(row);

        match event.kind() {
            EventKind::IdAssigned(raw) => self.on_id_assigned(&mut tx, raw, now),
            EventKind::IdCleared => self.on_id_cleared(&mut tx),
            EventKind::WatchLocation(raw) => {
                stamp_updated(&mut tx, now);
                self.on_watch_location(&mut tx, raw);
            }
            EventKind::EpisodeProgress(raw) => {
                stamp_updated(&mut tx, now);
                on_episode_progress(&mut tx, raw, now);
            }
            EventKind::StatusChanged(raw) => {
                stamp_updated(&mut tx, now);
                on_status_changed(&mut tx, raw, now.date());
            }
            EventKind::FieldEdited(field, raw) => {
                stamp_updated(&mut tx, now);
                on_field_edited(&mut tx, field, raw);
            }
            EventKind::MetadataArrived {
                primary,
                cross_reference,
            } => MetadataMapper::new(&self.config).map(&mut tx, primary, cross_reference),
        }

        debug!(writes = tx.writes.len(), "Row event handled");
        tx
    }

    fn on_id_assigned(&self, tx: &mut Transition, raw: &str, now: NaiveDateTime) {
        let id = extract_external_id(raw).unwrap_or_else(|| raw.to_string());
        if id != raw {
            info!(input = %raw, id = %id, "Extracted ID from URL");
        }

        let value = id
            .parse::<u64>()
            .map_or_else(|_| CellValue::text(&id), CellValue::Integer);
        if matches!(value, CellValue::Text(_)) {
            warn!(id = %id, "ID is not numeric; keeping it verbatim");
        }

        let cached = cached_payloads(&tx.row, &id);

        tx.set(Field::Id, value);
        tx.set(Field::LastAdded, CellValue::Timestamp(now));
        tx.set(Field::Title, CellValue::formula(LOADING_TITLE));

        if let Some((primary, cross_reference)) = cached {
            debug!(id = %id, "Metadata already present for this ID, mapping immediately");
            MetadataMapper::new(&self.config).map(tx, &primary, &cross_reference);
            return;
        }

        let metadata = &self.config.metadata;
        tx.set(
            Field::Metadata,
            CellValue::formula(formula::fetch(&metadata.primary_url_for(&id))),
        );
        tx.set(
            Field::CrossReference,
            CellValue::formula(formula::fetch(&metadata.cross_reference_url_for(&id))),
        );
    }

    fn on_id_cleared(&self, tx: &mut Transition) {
        tx.clear(Field::Id);

        if self.config.sheet.retain_data_on_clear {
            debug!("Retaining row data after ID clear");
        } else {
            let populated: Vec<Field> = tx.row.populated_fields().collect();
            for field in populated {
                if field.is_retained_on_clear()
                    || matches!(field, Field::Airing | Field::Metadata | Field::CrossReference)
                {
                    continue;
                }
                tx.clear(field);
                tx.note(field, None);
            }
        }

        tx.clear(Field::Poster);
        tx.note(Field::Title, None);
        tx.set(Field::Title, CellValue::formula(LOADING_TITLE));
        tx.set(Field::Airing, CellValue::Flag(false));
        tx.clear(Field::Metadata);
        tx.clear(Field::CrossReference);

        info!(cleared = tx.writes.len(), "Row reset after ID was cleared");
    }

    fn on_watch_location(&self, tx: &mut Transition, raw: &str) {
        let settings = &self.config.watch_location;

        if raw.is_empty() {
            tx.clear(Field::WatchLocation);
            tx.note(Field::WatchLocation, None);
            return;
        }

        if let Some(host) = web_host(raw) {
            tx.set(
                Field::WatchLocation,
                CellValue::formula(formula::favicon_link(raw, &host)),
            );
            tx.note(Field::WatchLocation, None);
            return;
        }

        if raw.eq_ignore_ascii_case(&settings.local_sentinel) {
            tx.set(
                Field::WatchLocation,
                CellValue::text(&settings.local_marker),
            );
            tx.note(Field::WatchLocation, Some(settings.local_note.clone()));
            return;
        }

        info!(value = %raw, "Watch location is not a URL or the local sentinel");
        tx.set(Field::WatchLocation, CellValue::text(raw));
    }
}

fn stamp_updated(tx: &mut Transition, now: NaiveDateTime) {
    tx.set(Field::LastUpdated, CellValue::Timestamp(now));
}

/// Payloads already stored in the row, if they describe `id`.
fn cached_payloads(row: &Row, id: &str) -> Option<(String, String)> {
    let primary = row.value(Field::Metadata).as_text()?;
    let cross_reference = row.value(Field::CrossReference).as_text()?;
    let payload = PrimaryPayload::parse(primary).ok()?;
    let cached_id = payload.data.mal_id?.to_string();
    (cached_id == id).then(|| (primary.to_string(), cross_reference.to_string()))
}

fn web_host(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().map(str::to_string)
}

/// Puts the prior value of `field` back over whatever the user typed.
fn restore(tx: &mut Transition, field: Field) {
    let prior = tx.row.value(field).clone();
    tx.force(CellWrite::set(field, prior));
}

/// Parses `raw` for `field`; on failure logs it and restores the prior value.
fn parse_or_restore(tx: &mut Transition, field: Field, raw: &str) -> Option<CellValue> {
    match CellValue::parse_input(field, raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(field = %field, error = %e, "Rejected edit, keeping prior value");
            restore(tx, field);
            None
        }
    }
}

fn on_field_edited(tx: &mut Transition, field: Field, raw: &str) {
    if let Some(value) = parse_or_restore(tx, field, raw) {
        tx.set(field, value);
        if field == Field::TotalEpisodes {
            tx.clamp_current_episode();
        }
    }
}

fn on_episode_progress(tx: &mut Transition, raw: &str, now: NaiveDateTime) {
    let Some(value) = parse_or_restore(tx, Field::CurrentEpisode, raw) else {
        return;
    };

    let CellValue::Integer(mut episode) = value else {
        tx.set(Field::CurrentEpisode, value);
        return;
    };

    let total = tx.row.total_episodes().filter(|t| *t > 0);
    if let Some(total) = total
        && episode > total
    {
        warn!(episode, total, "Current episode exceeds total, clamping");
        episode = total;
    }
    tx.set(Field::CurrentEpisode, CellValue::Integer(episode));

    let today = now.date();

    if total == Some(episode) {
        tx.set_status(WatchStatus::Finished);
        tx.set_date_if_unset(Field::EndDate, today);
        tx.set_date_if_unset(Field::StartDate, today);
        return;
    }

    if episode == 0 {
        return;
    }

    match tx.row.status() {
        Some(WatchStatus::Finished) => {
            tx.set_status(WatchStatus::Repeating);
            let line = format!("{REWATCH_PREFIX} {}", now.format(REWATCH_TIMESTAMP_FORMAT));
            let note = match tx.row.note(Field::Status) {
                Some(existing) if !existing.is_empty() => format!("{existing}\n{line}"),
                _ => line,
            };
            tx.note(Field::Status, Some(note));
            let repeats = tx.row.repeat_count().unwrap_or(0) + 1;
            tx.set(Field::Repeat, CellValue::Integer(repeats));
            tx.set(Field::EndDate, CellValue::Date(today));
        }
        Some(WatchStatus::Planned) => {
            tx.set_status(WatchStatus::Current);
            tx.set_date_if_unset(Field::StartDate, today);
        }
        Some(WatchStatus::Dropped | WatchStatus::Holding) => {
            tx.set_status(WatchStatus::Current);
        }
        Some(WatchStatus::Current | WatchStatus::Repeating) | None => {}
    }
}

fn on_status_changed(tx: &mut Transition, raw: &str, today: NaiveDate) {
    if raw.is_empty() {
        tx.clear(Field::Status);
        return;
    }

    let status = match raw.parse::<WatchStatus>() {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Rejected status edit, keeping prior value");
            restore(tx, Field::Status);
            return;
        }
    };

    tx.set_status(status);

    match status {
        WatchStatus::Finished => {
            tx.set_date_if_unset(Field::EndDate, today);
            if let Some(total) = tx.row.total_episodes().filter(|t| *t > 0) {
                tx.set(Field::CurrentEpisode, CellValue::Integer(total));
            }
        }
        WatchStatus::Current => tx.set_date_if_unset(Field::StartDate, today),
        _ => {}
    }
}
