mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            content_dir,
            drop_table,
        } => {
            let config = Config::load()?;
            let content_dir = content_dir.unwrap_or_else(|| config.content_dir.clone());
            let drop_table = drop_table.unwrap_or_else(|| config.drop_table.clone());
            let output = config.database_or(cli.database);
            commands::build::handle(&content_dir, &drop_table, &output)?;
        }

        Commands::Query { command, pretty } => {
            let config = Config::load()?;
            commands::query::handle(&config.database_or(cli.database), command, pretty)?;
        }

        Commands::Configure {
            content_dir,
            drop_table,
            set_database,
            show,
        } => {
            commands::configure::handle(content_dir, drop_table, set_database, show)?;
        }
    }

    Ok(())
}
