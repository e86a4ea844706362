//! Query command handlers

use crate::cli::QueryCommand;
use anyhow::{Context, Result};
use objmap_db::{QueryService, SqliteDb};
use serde_json::Value;
use std::path::Path;

/// Handle a query subcommand against the store at `database`
pub fn handle(database: &Path, command: QueryCommand, pretty: bool) -> Result<()> {
    let db = SqliteDb::open_read_only(database)
        .with_context(|| format!("Failed to open store {}", database.display()))?;

    let result = run(&db, command)?;
    let output = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);
    Ok(())
}

/// Run a query, returning its JSON result (`null` when nothing matched)
pub fn run(db: &SqliteDb, command: QueryCommand) -> Result<Value> {
    let service = QueryService::new(db);

    let value = match command {
        QueryCommand::Obj { objid } => serde_json::to_value(service.get_by_id(objid)?)?,

        QueryCommand::ObjAt {
            map_type,
            map_name,
            hash_id,
        } => serde_json::to_value(service.get_by_map_hash(&map_type, &map_name, hash_id)?)?,

        QueryCommand::GenGroup {
            map_type,
            map_name,
            hash_id,
        } => serde_json::to_value(service.get_generation_group(&map_type, &map_name, hash_id)?)?,

        QueryCommand::Search {
            map_type,
            q,
            map_name,
            limit,
            with_map_names,
        } => {
            let results = service
                .search(&map_type, map_name.as_deref(), Some(&q), limit, with_map_names)
                .with_context(|| format!("Search failed for '{}'", q))?;
            serde_json::to_value(results)?
        }

        QueryCommand::SearchIds {
            map_type,
            q,
            map_name,
        } => {
            let ids = service
                .search_ids(&map_type, map_name.as_deref(), Some(&q))
                .with_context(|| format!("Search failed for '{}'", q))?;
            serde_json::to_value(ids)?
        }
    };

    Ok(value)
}
