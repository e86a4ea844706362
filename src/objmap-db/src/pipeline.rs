//! Store build pipeline.
//!
//! Builds the object store from placement maps, derived attributes and the
//! drop table dataset. The whole build runs in one transaction against a
//! temporary file, which replaces the published store only on success.

use crate::repository::RepoResult;
use crate::shared::{queries, schema};
use crate::types::{BuildStats, DropTableEntry};
use objmap::{DerivedAttributes, GenGroupAnalysis, PlacementMap, PlacementSource, ReferenceData};
use rusqlite::{named_params, params, Connection};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the drop table dataset (a JSON array of rows)
pub fn load_drop_table<P: AsRef<Path>>(path: P) -> RepoResult<Vec<DropTableEntry>> {
    let content = fs::read_to_string(path.as_ref())?;
    let rows: Vec<DropTableEntry> = serde_json::from_str(&content)?;
    Ok(rows)
}

/// Path the build writes to before publishing
pub fn temp_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output.with_file_name(name)
}

/// Inputs for one store build
pub struct StoreBuilder<'a, S: PlacementSource + ?Sized> {
    source: &'a S,
    refs: &'a ReferenceData,
    drop_table: &'a [DropTableEntry],
}

impl<'a, S: PlacementSource + ?Sized> StoreBuilder<'a, S> {
    pub fn new(source: &'a S, refs: &'a ReferenceData, drop_table: &'a [DropTableEntry]) -> Self {
        Self {
            source,
            refs,
            drop_table,
        }
    }

    /// Build the store and atomically publish it at `output`.
    ///
    /// On failure the temporary file is removed and any store already at
    /// `output` is left untouched.
    pub fn build<P: AsRef<Path>>(&self, output: P) -> RepoResult<BuildStats> {
        let output = output.as_ref();
        let tmp = temp_path(output);
        if tmp.exists() {
            fs::remove_file(&tmp)?;
        }

        match self.build_at(&tmp) {
            Ok(stats) => {
                fs::rename(&tmp, output)?;
                tracing::info!("Published {}", output.display());
                Ok(stats)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    tracing::warn!("Failed to remove {}: {}", tmp.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    fn build_at(&self, path: &Path) -> RepoResult<BuildStats> {
        let mut conn = Connection::open(path)?;
        let stats = self.populate(&mut conn)?;
        conn.close().map_err(|(_, e)| e)?;
        Ok(stats)
    }

    /// Create the schema and fill it in a single transaction
    pub fn populate(&self, conn: &mut Connection) -> RepoResult<BuildStats> {
        let tx = conn.transaction()?;
        tx.execute_batch(schema::OBJS_TABLE)?;
        tx.execute_batch(schema::DROP_TABLE_TABLE)?;

        let mut stats = BuildStats::default();
        for key in self.source.map_keys()? {
            for variant in objmap::MapVariant::ALL {
                let map = self.source.load(&key, variant)?;
                stats.objs += insert_map(&tx, &map, self.refs)?;
                stats.map_instances += 1;
            }
        }

        tracing::info!("Creating drop table data ({} rows)", self.drop_table.len());
        stats.drop_table_rows = insert_drop_table(&tx, self.drop_table)?;

        tracing::info!("Creating indexes");
        tx.execute_batch(schema::INDEXES)?;

        tracing::info!("Creating FTS tables");
        tx.execute_batch(schema::FTS)?;

        tx.commit()?;
        Ok(stats)
    }
}

/// Insert every object of one map instance, returning the count
pub fn insert_map(
    conn: &Connection,
    map: &PlacementMap,
    refs: &ReferenceData,
) -> RepoResult<usize> {
    let groups = GenGroupAnalysis::for_last_boss_mode(&map.objs, refs);
    let mut stmt = conn.prepare_cached(queries::INSERT_OBJ)?;

    for obj in &map.objs {
        let derived = DerivedAttributes::derive(obj, refs);
        let data = serde_json::to_string(&obj.data)?;
        let drop = derived.drop.as_ref().map(serde_json::to_string).transpose()?;
        let equip = derived.equip.as_ref().map(serde_json::to_string).transpose()?;

        stmt.execute(named_params! {
            ":map_type": map.key.map_type,
            ":map_name": map.key.map_name,
            ":map_static": map.variant.is_static(),
            ":gen_group": obj.gen_group_id,
            ":hash_id": obj.data.hash_id,
            ":unit_config_name": obj.data.unit_config_name,
            ":ui_name": derived.ui_name,
            ":data": data,
            ":one_hit_mode": derived.one_hit_mode,
            ":last_boss_mode": groups.last_boss_mode(obj.gen_group_id),
            ":hard_mode": derived.hard_mode,
            ":disable_rankup_for_hard_mode": derived.disable_rankup_for_hard_mode,
            ":scale": derived.scale,
            ":sharp_weapon_judge_type": derived.sharp_weapon_judge_type,
            ":drop": drop,
            ":equip": equip,
            ":ui_drop": derived.ui_drop,
            ":ui_equip": derived.ui_equip,
            ":messageid": derived.messageid,
        })?;
    }

    tracing::info!(
        objs = map.objs.len(),
        groups = groups.group_count(),
        "Processed {} (static: {})",
        map.key,
        map.variant.is_static()
    );
    Ok(map.objs.len())
}

/// JSON text for a drop table payload.
///
/// Datasets carry `data` either as structured JSON or as JSON text; text is
/// checked and stored as-is so it is not encoded twice.
fn drop_data_text(data: &Value) -> RepoResult<String> {
    match data {
        Value::String(text) => {
            serde_json::from_str::<Value>(text)?;
            Ok(text.clone())
        }
        other => Ok(serde_json::to_string(other)?),
    }
}

/// Insert the drop table dataset verbatim
pub fn insert_drop_table(conn: &Connection, rows: &[DropTableEntry]) -> RepoResult<usize> {
    let mut stmt = conn.prepare_cached(queries::INSERT_DROP_TABLE)?;
    for row in rows {
        let data = drop_data_text(&row.data)?;
        stmt.execute(params![row.unit_config_name, row.table_name, data])?;
    }
    Ok(rows.len())
}
