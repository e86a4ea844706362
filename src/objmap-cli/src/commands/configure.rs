//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up objmap CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(
    content_dir: Option<PathBuf>,
    drop_table: Option<PathBuf>,
    database: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if apply(&mut config, content_dir, drop_table, database) {
        config.save()?;
        println!("Configuration saved");
        show_config(&config);
    } else {
        show_usage();
    }

    Ok(())
}

/// Apply overrides, returning whether anything changed
fn apply(
    config: &mut Config,
    content_dir: Option<PathBuf>,
    drop_table: Option<PathBuf>,
    database: Option<PathBuf>,
) -> bool {
    let mut changed = false;
    if let Some(dir) = content_dir {
        config.content_dir = dir;
        changed = true;
    }
    if let Some(path) = drop_table {
        config.drop_table = path;
        changed = true;
    }
    if let Some(path) = database {
        config.database = path;
        changed = true;
    }
    changed
}

fn show_config(config: &Config) {
    println!("Content dir: {}", config.content_dir.display());
    println!("Drop table:  {}", config.drop_table.display());
    println!("Database:    {}", config.database.display());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

fn show_usage() {
    println!("Usage: objmap configure [--content-dir <DIR>] [--drop-table <FILE>]");
    println!("                        [--set-database <FILE>]");
    println!("       objmap configure --show");
}
