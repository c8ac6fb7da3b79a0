use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::domain::events::RowEvent;
use crate::models::{CellValue, Field};
use crate::services::RowSynchronizer;
use crate::sheet::SheetStore;

pub fn cmd_edit(config: &Config, row_number: usize, field: &str, value: &str) -> anyhow::Result<()> {
    let registry = config.layout.registry()?;
    let store = SheetStore::new(&config.sheet.path, config.sheet.first_data_row);
    let index = super::row_index(&store, row_number)?;
    let event = RowEvent::edit_named(&registry, field, value)?;

    let mut sheet = store.load()?;
    let row = sheet.row_mut(index)?.clone();

    let synchronizer = RowSynchronizer::new(config.clone());
    let tx = synchronizer.apply(row, &event, Local::now().naive_local());

    super::print_writes(&registry, row_number, &tx.writes);

    let fetch_pending = matches!(tx.row.value(Field::Metadata), CellValue::Formula(_));
    sheet.replace(index, tx.row)?;
    store.save(&sheet)?;

    if fetch_pending {
        info!(row = row_number, "Metadata fetch pending");
        println!("Run `anisheet refresh --row {row_number}` to fetch metadata.");
    }

    Ok(())
}
