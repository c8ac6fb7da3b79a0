use chrono::Local;
use tracing::{info, warn};

use crate::clients::{AnimeApiClient, JikanClient};
use crate::config::Config;
use crate::domain::events::RowEvent;
use crate::services::RowSynchronizer;
use crate::sheet::SheetStore;

pub async fn cmd_refresh(config: &Config, row_number: usize) -> anyhow::Result<()> {
    let registry = config.layout.registry()?;
    let store = SheetStore::new(&config.sheet.path, config.sheet.first_data_row);
    let index = super::row_index(&store, row_number)?;
    let mut sheet = store.load()?;

    let Some(row) = sheet.row(index).cloned() else {
        println!("Row {row_number} is empty.");
        return Ok(());
    };
    let Some(id) = row.external_id() else {
        println!("Row {row_number} has no numeric ID to refresh.");
        return Ok(());
    };

    let jikan = JikanClient::new(&config.metadata)?;
    let animeapi = AnimeApiClient::new(&config.metadata)?;

    println!("Fetching metadata for {id}...");
    let (primary, cross_reference) =
        tokio::join!(jikan.get_anime_raw(id), animeapi.get_mapping_raw(id));

    let primary = primary?.unwrap_or_else(|| {
        warn!(id = %id, "Primary source has no entry");
        String::new()
    });
    let cross_reference = match cross_reference {
        Ok(Some(body)) => body,
        Ok(None) => {
            warn!(id = %id, "Cross-reference source has no entry");
            String::new()
        }
        Err(e) => {
            warn!(id = %id, error = %e, "Cross-reference fetch failed, continuing without it");
            String::new()
        }
    };

    if primary.is_empty() && cross_reference.is_empty() {
        println!("No metadata found for {id}.");
        return Ok(());
    }

    let event = RowEvent::MetadataArrived {
        primary,
        cross_reference,
    };
    let synchronizer = RowSynchronizer::new(config.clone());
    let tx = synchronizer.apply(row, &event, Local::now().naive_local());

    super::print_writes(&registry, row_number, &tx.writes);
    info!(row = row_number, writes = tx.writes.len(), "Metadata applied");

    sheet.replace(index, tx.row)?;
    store.save(&sheet)?;
    Ok(())
}
