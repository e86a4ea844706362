//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::query::QueryCommand;

#[derive(Parser)]
#[command(name = "objmap")]
#[command(about = "Object map placement indexer", long_about = None)]
pub struct Cli {
    /// Store to build or query (overrides the configured database)
    #[arg(long, global = true, env = "OBJMAP_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the store from placement maps and reference data
    #[command(visible_alias = "b")]
    Build {
        /// Directory holding reference data and placement maps
        #[arg(long)]
        content_dir: Option<PathBuf>,

        /// Drop table dataset (JSON array)
        #[arg(long)]
        drop_table: Option<PathBuf>,
    },

    /// Query a published store
    #[command(visible_alias = "q")]
    Query {
        #[command(subcommand)]
        command: QueryCommand,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default content directory
        #[arg(long)]
        content_dir: Option<PathBuf>,

        /// Set the default drop table dataset
        #[arg(long)]
        drop_table: Option<PathBuf>,

        /// Set the default store location
        #[arg(long = "set-database")]
        set_database: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
