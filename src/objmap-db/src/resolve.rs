//! Read-time resolution of composite attributes.
//!
//! Drop tables are not stored per object. They are reconstructed from the
//! object's drop descriptor and parameters plus the verbatim drop table
//! dataset.

use crate::repository::{ObjRepository, RepoResult};
use crate::types::{merge_drop_tables, DropTableMap, ObjRecord};
use serde_json::Value;

/// Table names an object may draw drops from, besides the `Normal*` tables.
///
/// In order: the named table of the drop descriptor, the `ArrowName`
/// parameter, and the object's own actor name.
pub fn candidate_table_names(record: &ObjRecord) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(table) = record.drop_descriptor().table_name() {
        names.push(table.to_string());
    }

    let arrow = record
        .params()
        .and_then(|p| p.get("ArrowName"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    if let Some(arrow) = arrow {
        names.push(arrow.to_string());
    }

    names.push(record.unit_config_name.clone());
    names
}

/// Resolve the drop tables that apply to an object.
///
/// Objects that drop a specific actor never resolve to a table.
pub fn resolve_drop_table<R: ObjRepository + ?Sized>(
    repo: &R,
    record: &ObjRecord,
) -> RepoResult<Option<DropTableMap>> {
    if record.drop_descriptor().is_actor() {
        return Ok(None);
    }

    let candidates = candidate_table_names(record);
    tracing::debug!(
        objid = record.objid,
        actor = %record.unit_config_name,
        ?candidates,
        "Resolving drop table"
    );
    let rows = repo.find_drop_tables(&record.unit_config_name, &candidates)?;
    Ok(merge_drop_tables(rows))
}

/// Every drop table registered for the object's actor
pub fn resolve_all_drop_tables<R: ObjRepository + ?Sized>(
    repo: &R,
    record: &ObjRecord,
) -> RepoResult<Option<DropTableMap>> {
    let rows = repo.all_drop_tables(&record.unit_config_name)?;
    Ok(merge_drop_tables(rows))
}

/// Generation group members of the object at `(map_type, map_name, hash_id)`.
///
/// Returns `None` when no such object exists.
pub fn gen_group_siblings<R: ObjRepository + ?Sized>(
    repo: &R,
    map_type: &str,
    map_name: &str,
    hash_id: u32,
) -> RepoResult<Option<Vec<ObjRecord>>> {
    match repo.get_obj_by_hash(map_type, map_name, hash_id)? {
        Some(obj) => repo.get_gen_group(&obj).map(Some),
        None => Ok(None),
    }
}
