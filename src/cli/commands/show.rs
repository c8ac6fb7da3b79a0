use crate::config::Config;
use crate::sheet::SheetStore;

pub fn cmd_show(config: &Config, row_number: usize) -> anyhow::Result<()> {
    let registry = config.layout.registry()?;
    let store = SheetStore::new(&config.sheet.path, config.sheet.first_data_row);
    let index = super::row_index(&store, row_number)?;
    let sheet = store.load()?;

    let Some(row) = sheet.row(index).filter(|r| r.populated_fields().next().is_some()) else {
        println!("Row {row_number} is empty.");
        return Ok(());
    };

    println!("Row {row_number}");
    println!("{:-<60}", "");
    for (_, field) in registry.fields() {
        let value = row.value(field);
        let note = row.note(field);
        if value.is_empty() && note.is_none() {
            continue;
        }
        let address = registry.address(field, row_number).unwrap_or_default();
        println!("{address:<6} {:<16} {value}", field.name());
        if let Some(note) = note {
            println!("{:<23} note: {note}", "");
        }
    }

    Ok(())
}
