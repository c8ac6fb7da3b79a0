use crate::config::Config;
use crate::registry::position_to_letter;

pub fn cmd_fields(config: &Config) -> anyhow::Result<()> {
    let registry = config.layout.registry()?;

    println!("{:<6} {:<8} {:<18} Kind", "Col", "Pos", "Field");
    println!("{:-<48}", "");
    for (position, field) in registry.fields() {
        println!(
            "{:<6} {:<8} {:<18} {:?}",
            position_to_letter(position),
            position,
            field.name(),
            field.kind()
        );
    }

    Ok(())
}
