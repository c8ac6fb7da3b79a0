pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod links;
pub mod models;
pub mod parser;
pub mod registry;
pub mod services;
pub mod sheet;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
pub use error::SyncError;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    init_tracing(&config);
    config.validate()?;
    debug!(sheet = %config.sheet.path, "Configuration loaded");

    match cli.command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }
        Commands::Fields => cli::cmd_fields(&config),
        Commands::Link { site, id, title } => {
            cli::cmd_link(&site, &id, title.as_deref());
            Ok(())
        }
        Commands::Edit { row, field, value } => cli::cmd_edit(&config, row, &field, &value),
        Commands::Refresh { row } => cli::cmd_refresh(&config, row).await,
        Commands::Show { row } => cli::cmd_show(&config, row),
    }
}

fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
