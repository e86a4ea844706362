//! Store build command handler

use anyhow::{Context, Result};
use objmap::{JsonPlacementSource, ReferenceData};
use objmap_db::{load_drop_table, BuildStats, StoreBuilder};
use std::path::Path;

/// Build the store from `content_dir` and publish it at `output`
pub fn handle(content_dir: &Path, drop_table: &Path, output: &Path) -> Result<BuildStats> {
    let refs = ReferenceData::load(content_dir).with_context(|| {
        format!("Failed to load reference data from {}", content_dir.display())
    })?;

    tracing::info!("Loading drop table data from {}", drop_table.display());
    let drops = load_drop_table(drop_table)
        .with_context(|| format!("Failed to load drop table from {}", drop_table.display()))?;

    let source = JsonPlacementSource::from_content_dir(content_dir);
    let stats = StoreBuilder::new(&source, &refs, &drops)
        .build(output)
        .with_context(|| format!("Failed to build {}", output.display()))?;

    println!(
        "Built {}: {} objects from {} map instances, {} drop table rows",
        output.display(),
        stats.objs,
        stats.map_instances,
        stats.drop_table_rows
    );
    Ok(stats)
}
