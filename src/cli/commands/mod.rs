mod edit;
mod fields;
mod link;
mod refresh;
mod show;

pub use edit::cmd_edit;
pub use fields::cmd_fields;
pub use link::cmd_link;
pub use refresh::cmd_refresh;
pub use show::cmd_show;

use anyhow::Result;
use tracing::warn;

use crate::models::{CellChange, CellWrite};
use crate::registry::FieldRegistry;
use crate::sheet::SheetStore;

/// Maps a sheet row number to a row index, rejecting header rows.
fn row_index(store: &SheetStore, row_number: usize) -> Result<usize> {
    store.index_of(row_number).ok_or_else(|| {
        anyhow::anyhow!(
            "Row {row_number} is a header row; data starts at row {}",
            store.row_number(0)
        )
    })
}

fn print_writes(registry: &FieldRegistry, row_number: usize, writes: &[CellWrite]) {
    if writes.is_empty() {
        println!("No changes.");
        return;
    }

    for write in writes {
        let Some(address) = registry.address(write.field, row_number) else {
            warn!(field = %write.field, "No column for written field, skipping");
            continue;
        };
        match &write.change {
            CellChange::Set(value) if value.is_empty() => {
                println!("{address:<6} {:<16} (cleared)", write.field.name());
            }
            CellChange::Set(value) => println!("{address:<6} {:<16} {value}", write.field.name()),
            CellChange::Note(Some(note)) => {
                println!("{address:<6} {:<16} note: {note}", write.field.name());
            }
            CellChange::Note(None) => println!("{address:<6} {:<16} (note removed)", write.field.name()),
        }
    }
}
