//! SQLite implementation using rusqlite.
//!
//! A published store is opened read-only. Connections are not shared
//! between threads: each concurrent reader opens its own.

use crate::repository::*;
use crate::shared::{self, queries};
use crate::types::*;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, ToSql};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "map.db";

/// SQLite-backed object store
pub struct SqliteDb {
    conn: Connection,
}

/// Parse a JSON text column, keeping SQL NULL as `None`
fn json_column<T: DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        serde_json::from_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ObjRecord> {
    Ok(ObjRecord {
        objid: row.get(0)?,
        map_type: row.get(1)?,
        map_name: row.get(2)?,
        map_static: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        gen_group: row.get(4)?,
        hash_id: row.get(5)?,
        unit_config_name: row.get(6)?,
        ui_name: row.get(7)?,
        data: json_column(row, 8)?.unwrap_or_default(),
        one_hit_mode: row.get::<_, Option<bool>>(9)?.unwrap_or(false),
        last_boss_mode: row.get::<_, Option<bool>>(10)?.unwrap_or(false),
        hard_mode: row.get::<_, Option<bool>>(11)?.unwrap_or(false),
        disable_rankup_for_hard_mode: row.get::<_, Option<bool>>(12)?.unwrap_or(false),
        scale: row.get(13)?,
        sharp_weapon_judge_type: row.get(14)?,
        drop: json_column(row, 15)?,
        equip: json_column(row, 16)?,
        ui_drop: row.get(17)?,
        ui_equip: row.get(18)?,
        messageid: row.get(19)?,
    })
}

fn row_to_drop_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<DropTableEntry> {
    Ok(DropTableEntry {
        unit_config_name: row.get(0)?,
        table_name: row.get(1)?,
        data: json_column(row, 2)?.unwrap_or_default(),
    })
}

/// Build named parameters for a search query
fn build_search_params(query: &SearchQuery) -> Vec<(&'static str, Box<dyn ToSql>)> {
    let mut params: Vec<(&'static str, Box<dyn ToSql>)> = Vec::new();
    params.push((":map_type", Box::new(query.map_type.clone())));
    if let Some(name) = &query.map_name {
        params.push((":map_name", Box::new(name.clone())));
    }
    params.push((":q", Box::new(query.match_text().unwrap_or_default().to_string())));
    if let Some(limit) = query.limit {
        params.push((":limit", Box::new(limit)));
    }
    params
}

/// Error message prefixes FTS5 reports for an unparsable match expression
const MALFORMED_MATCH_PREFIXES: &[&str] = &[
    "fts5:",
    "no such column",
    "unterminated string",
    "expected integer",
];

/// Whether SQLite rejected the full-text match expression itself
fn is_malformed_match(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => MALFORMED_MATCH_PREFIXES
            .iter()
            .any(|prefix| msg.starts_with(prefix)),
        _ => false,
    }
}

/// Malformed match expressions are caller input errors and match nothing
fn empty_on_malformed_match<T>(
    query: &SearchQuery,
    result: rusqlite::Result<Vec<T>>,
) -> RepoResult<Vec<T>> {
    match result {
        Ok(rows) => Ok(rows),
        Err(e) if is_malformed_match(&e) => {
            tracing::debug!(query = ?query.match_text(), "Malformed search: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

impl SqliteDb {
    /// Open a published store for reading
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection (e.g. one populated in memory)
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Number of stored objects and drop table rows
    pub fn counts(&self) -> RepoResult<(usize, usize)> {
        let objs: i64 = self.conn.query_row(queries::COUNT_OBJS, [], |row| row.get(0))?;
        let drops: i64 = self
            .conn
            .query_row(queries::COUNT_DROP_TABLE, [], |row| row.get(0))?;
        Ok((objs as usize, drops as usize))
    }

    fn query_records<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> RepoResult<Vec<ObjRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map(params, row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn query_drop_entries<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> RepoResult<Vec<DropTableEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, row_to_drop_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn run_search<T, F>(
        &self,
        sql: &str,
        query: &SearchQuery,
        map_row: F,
    ) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let params_vec = build_search_params(query);
        let params_refs: Vec<(&str, &dyn ToSql)> = params_vec
            .iter()
            .map(|(name, value)| (*name, value.as_ref()))
            .collect();
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_refs.as_slice(), map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl ObjRepository for SqliteDb {
    fn get_obj(&self, objid: i64) -> RepoResult<Option<ObjRecord>> {
        let mut stmt = self.conn.prepare(&shared::get_obj_query())?;
        let record = stmt.query_row(params![objid], row_to_record).optional()?;
        Ok(record)
    }

    fn get_obj_by_hash(
        &self,
        map_type: &str,
        map_name: &str,
        hash_id: u32,
    ) -> RepoResult<Option<ObjRecord>> {
        let mut stmt = self.conn.prepare(&shared::get_obj_by_hash_query())?;
        let record = stmt
            .query_row(params![map_type, map_name, hash_id], row_to_record)
            .optional()?;
        Ok(record)
    }

    fn get_gen_group(&self, obj: &ObjRecord) -> RepoResult<Vec<ObjRecord>> {
        self.query_records(
            &shared::gen_group_query(),
            params![obj.map_type, obj.map_name, obj.map_static, obj.gen_group],
        )
    }

    fn search(&self, query: &SearchQuery) -> RepoResult<Vec<ObjRecord>> {
        if !query.is_runnable() {
            return Ok(Vec::new());
        }
        let sql = shared::build_search_query(query, false);
        let result = self.run_search(&sql, query, row_to_record);
        empty_on_malformed_match(query, result)
    }

    fn search_ids(&self, query: &SearchQuery) -> RepoResult<Vec<i64>> {
        if !query.is_runnable() {
            return Ok(Vec::new());
        }
        let sql = shared::build_search_query(query, true);
        let result = self.run_search(&sql, query, |row| row.get(0));
        empty_on_malformed_match(query, result)
    }

    fn find_drop_tables(
        &self,
        unit_config_name: &str,
        table_names: &[String],
    ) -> RepoResult<Vec<DropTableEntry>> {
        let mut names: Vec<&str> = table_names.iter().map(String::as_str).collect();
        if names.is_empty() {
            // Keeps the IN list well-formed; only Normal* rows can match then
            names.push(unit_config_name);
        }
        let sql = shared::drop_table_query(names.len());
        let bound = std::iter::once(unit_config_name).chain(names);
        self.query_drop_entries(&sql, params_from_iter(bound))
    }

    fn all_drop_tables(&self, unit_config_name: &str) -> RepoResult<Vec<DropTableEntry>> {
        self.query_drop_entries(queries::ALL_DROP_TABLES, params![unit_config_name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::schema;
    use objmap::DropDescriptor;
    use serde_json::json;

    fn setup_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.conn
            .execute_batch(&format!(
                "{}{}",
                schema::OBJS_TABLE,
                schema::DROP_TABLE_TABLE
            ))
            .unwrap();
        db
    }

    fn insert(
        db: &SqliteDb,
        map_name: &str,
        map_static: bool,
        gen_group: u32,
        hash_id: u32,
        name: &str,
    ) {
        db.conn
            .execute(
                r#"INSERT INTO objs (map_type, map_name, map_static, gen_group, hash_id,
                    unit_config_name, ui_name, data, "drop", equip)
                   VALUES ('MainField', ?1, ?2, ?3, ?4, ?5, ?5, ?6,
                           '[2,"Rare"]', '["Weapon_Sword_001"]')"#,
                params![
                    map_name,
                    map_static,
                    gen_group,
                    hash_id,
                    name,
                    json!({"HashId": hash_id, "UnitConfigName": name}).to_string()
                ],
            )
            .unwrap();
    }

    fn insert_drop(db: &SqliteDb, actor: &str, table: &str) {
        db.conn
            .execute(
                queries::INSERT_DROP_TABLE,
                params![actor, table, json!({"table": table}).to_string()],
            )
            .unwrap();
    }

    #[test]
    fn test_get_obj_round_trip() {
        let db = setup_db();
        insert(&db, "A-1", true, 0, 100, "Enemy_Bokoblin_Junior");

        let record = db.get_obj(1).unwrap().unwrap();
        assert_eq!(record.hash_id, 100);
        assert!(record.map_static);
        assert_eq!(record.drop, Some(DropDescriptor::Table("Rare".into())));
        assert_eq!(record.equip, Some(vec!["Weapon_Sword_001".to_string()]));
        assert_eq!(record.data["UnitConfigName"], "Enemy_Bokoblin_Junior");
        assert_eq!(record.scale, Some(0));
        assert!(record.ui_drop.is_none());
    }

    #[test]
    fn test_get_obj_not_found() {
        let db = setup_db();
        assert!(db.get_obj(42).unwrap().is_none());
        assert!(db.get_obj_by_hash("MainField", "A-1", 1).unwrap().is_none());
    }

    #[test]
    fn test_get_obj_by_hash() {
        let db = setup_db();
        insert(&db, "A-1", true, 0, 100, "Enemy_Bokoblin_Junior");
        insert(&db, "A-2", true, 0, 100, "TBox_Field_Wood");

        let record = db.get_obj_by_hash("MainField", "A-2", 100).unwrap().unwrap();
        assert_eq!(record.unit_config_name, "TBox_Field_Wood");
    }

    #[test]
    fn test_gen_group_scoped_to_map_instance() {
        let db = setup_db();
        insert(&db, "A-1", true, 3, 1, "Enemy_Bokoblin_Junior");
        insert(&db, "A-1", true, 3, 2, "TBox_Field_Wood");
        insert(&db, "A-1", false, 3, 3, "Obj_TreeApple_A_01");
        insert(&db, "A-2", true, 3, 4, "Obj_TreeApple_A_01");
        insert(&db, "A-1", true, 4, 5, "Obj_TreeApple_A_01");

        let obj = db.get_obj(1).unwrap().unwrap();
        let group = db.get_gen_group(&obj).unwrap();
        let hashes: Vec<u32> = group.iter().map(|r| r.hash_id).collect();
        assert_eq!(hashes, vec![1, 2]);
    }

    #[test]
    fn test_find_drop_tables_tiers() {
        let db = setup_db();
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Normal");
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Normal2");
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Rare");
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Unused");
        insert_drop(&db, "Enemy_Moriblin_Junior", "Rare");

        let rows = db
            .find_drop_tables("Enemy_Bokoblin_Junior", &["Rare".to_string()])
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.table_name.as_str()).collect();
        assert_eq!(names, vec!["Normal", "Normal2", "Rare"]);

        let rows = db.find_drop_tables("Enemy_Bokoblin_Junior", &[]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_all_drop_tables() {
        let db = setup_db();
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Normal");
        insert_drop(&db, "Enemy_Bokoblin_Junior", "Unused");
        insert_drop(&db, "Enemy_Moriblin_Junior", "Rare");

        assert_eq!(db.all_drop_tables("Enemy_Bokoblin_Junior").unwrap().len(), 2);
        assert!(db.all_drop_tables("Obj_Nothing").unwrap().is_empty());
    }

    #[test]
    fn test_search_without_text_is_empty() {
        let db = setup_db();
        insert(&db, "A-1", true, 0, 1, "Enemy_Bokoblin_Junior");
        // No FTS table exists here; an unrunnable query must not touch it
        let query = SearchQuery::new("MainField");
        assert!(db.search(&query).unwrap().is_empty());
        assert!(db.search_ids(&query).unwrap().is_empty());
    }

    #[test]
    fn test_missing_index_is_still_an_error() {
        let db = setup_db();
        insert(&db, "A-1", true, 0, 1, "Enemy_Bokoblin_Junior");
        let query = SearchQuery::new("MainField").text(Some("Bokoblin"));
        assert!(matches!(db.search(&query), Err(RepoError::Database(_))));
        assert!(db.search_ids(&query).is_err());
    }
}
