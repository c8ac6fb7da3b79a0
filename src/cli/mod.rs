//! CLI module - Command-line interface for anisheet
//!
//! Each command loads the sheet file, routes one event through the row
//! synchronizer and prints the resulting cell writes.

mod commands;

use clap::{Parser, Subcommand};

/// anisheet - Anime tracking sheet synchronizer
#[derive(Parser)]
#[command(name = "anisheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the usual search paths)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List the sheet's columns in order
    #[command(alias = "columns")]
    Fields,

    /// Print the canonical URL of an ID on a site
    Link {
        /// Site short-code (MAL, AL, KT, ...)
        site: String,
        /// ID on that site
        id: String,
        /// Title used for the URL slug on sites that take one
        #[arg(long)]
        title: Option<String>,
    },

    /// Edit a cell as a user would and apply the row rules
    #[command(alias = "e")]
    Edit {
        /// Sheet row number
        #[arg(long)]
        row: usize,
        /// Column header of the edited field
        #[arg(long)]
        field: String,
        /// New cell content; omit to clear the cell
        #[arg(default_value = "")]
        value: String,
    },

    /// Fetch metadata for a row and apply it
    #[command(alias = "r")]
    Refresh {
        /// Sheet row number
        #[arg(long)]
        row: usize,
    },

    /// Show the populated cells of a row
    #[command(alias = "s")]
    Show {
        /// Sheet row number
        #[arg(long)]
        row: usize,
    },
}

pub use commands::*;
