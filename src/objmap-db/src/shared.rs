//! SQL constants, column definitions and query building.
//!
//! Everything here is plain text shared by the build pipeline and the
//! SQLite repository.

use crate::types::SearchQuery;

/// Column list for SELECT queries.
/// Order must match the positional indices used in row mapping.
pub const OBJ_SELECT_COLUMNS: &str = "objid, map_type, map_name, map_static, gen_group, hash_id,
                    unit_config_name, ui_name, data, one_hit_mode, last_boss_mode, hard_mode,
                    disable_rankup_for_hard_mode, scale, sharp_weapon_judge_type, \"drop\", equip,
                    ui_drop, ui_equip, messageid";

/// Name prefix of actor-agnostic fallback drop tables, as a LIKE pattern
pub const NORMAL_TABLE_PATTERN: &str = "Normal%";

/// SQLite schema definitions
pub mod schema {
    /// Placement objects with derived attributes
    pub const OBJS_TABLE: &str = r#"
        DROP TABLE IF EXISTS objs;
        CREATE TABLE objs (
            objid INTEGER PRIMARY KEY,
            map_type TEXT NOT NULL,
            map_name TEXT NOT NULL,
            map_static BOOL,
            gen_group INTEGER,
            hash_id INTEGER,
            unit_config_name TEXT NOT NULL,
            ui_name TEXT NOT NULL,
            data JSON NOT NULL,
            one_hit_mode BOOL DEFAULT 0,
            last_boss_mode BOOL DEFAULT 0,
            hard_mode BOOL DEFAULT 0,
            disable_rankup_for_hard_mode BOOL DEFAULT 0,
            scale INTEGER DEFAULT 0,
            sharp_weapon_judge_type INTEGER DEFAULT 0,
            "drop" JSON,
            equip JSON,
            ui_drop TEXT,
            ui_equip TEXT,
            messageid TEXT
        );
    "#;

    /// Drop table dataset, loaded verbatim
    pub const DROP_TABLE_TABLE: &str = r#"
        DROP TABLE IF EXISTS drop_table;
        CREATE TABLE drop_table (
            unit_config_name TEXT NOT NULL,
            name TEXT NOT NULL,
            data JSON
        );
    "#;

    /// Secondary indexes, created after bulk insertion
    pub const INDEXES: &str = r#"
        CREATE INDEX objs_map ON objs (map_type, map_name);
        CREATE INDEX objs_map_type ON objs (map_type);
        CREATE INDEX objs_hash_id ON objs (hash_id);
        CREATE INDEX objs_gen_group ON objs (gen_group);
        CREATE INDEX objs_unit_config_name ON objs (unit_config_name);
        CREATE INDEX drop_table_unit_config_name ON drop_table (unit_config_name);
    "#;

    /// Contentless full-text index keyed by objid
    pub const FTS: &str = r#"
        DROP TABLE IF EXISTS objs_fts;
        CREATE VIRTUAL TABLE objs_fts USING fts5(
            content='', map, actor, name, data, "drop", equip,
            onehit, lastboss, hard, no_rankup, scale, bonus, static
        );

        INSERT INTO objs_fts (rowid, map, actor, name, data, "drop", equip,
            onehit, lastboss, hard, no_rankup, scale, bonus, static)
        SELECT objid, map_type || '/' || map_name, unit_config_name, ui_name, data,
            ui_drop, ui_equip, one_hit_mode, last_boss_mode, hard_mode,
            disable_rankup_for_hard_mode, scale, sharp_weapon_judge_type, map_static
        FROM objs;
    "#;
}

/// Common SQL queries
pub mod queries {
    pub const INSERT_OBJ: &str = r#"INSERT INTO objs
        (map_type, map_name, map_static, gen_group, hash_id, unit_config_name, ui_name, data,
         one_hit_mode, last_boss_mode, hard_mode, disable_rankup_for_hard_mode, scale,
         sharp_weapon_judge_type, "drop", equip, ui_drop, ui_equip, messageid)
        VALUES
        (:map_type, :map_name, :map_static, :gen_group, :hash_id, :unit_config_name, :ui_name,
         :data, :one_hit_mode, :last_boss_mode, :hard_mode, :disable_rankup_for_hard_mode,
         :scale, :sharp_weapon_judge_type, :drop, :equip, :ui_drop, :ui_equip, :messageid)"#;

    pub const INSERT_DROP_TABLE: &str =
        "INSERT INTO drop_table (unit_config_name, name, data) VALUES (?1, ?2, ?3)";

    pub const ALL_DROP_TABLES: &str = "SELECT unit_config_name, name, data FROM drop_table
        WHERE unit_config_name = ?1 ORDER BY rowid";

    pub const COUNT_OBJS: &str = "SELECT COUNT(*) FROM objs";
    pub const COUNT_DROP_TABLE: &str = "SELECT COUNT(*) FROM drop_table";
}

/// Query for an object by record id
pub fn get_obj_query() -> String {
    format!("SELECT {} FROM objs WHERE objid = ?1", OBJ_SELECT_COLUMNS)
}

/// Query for an object by map partition and hash id
pub fn get_obj_by_hash_query() -> String {
    format!(
        "SELECT {} FROM objs
         WHERE map_type = ?1 AND map_name = ?2 AND hash_id = ?3
         ORDER BY objid LIMIT 1",
        OBJ_SELECT_COLUMNS
    )
}

/// Query for the members of a generation group within one map instance
pub fn gen_group_query() -> String {
    format!(
        "SELECT {} FROM objs
         WHERE map_type = ?1 AND map_name = ?2 AND map_static = ?3 AND gen_group = ?4
         ORDER BY objid",
        OBJ_SELECT_COLUMNS
    )
}

/// Tiered drop table lookup with `candidates` bound names after the actor.
///
/// The actor is `?1`; candidate names are `?2..`. At least one candidate
/// is expected, since the actor's own name is always one.
pub fn drop_table_query(candidates: usize) -> String {
    let placeholders = (0..candidates.max(1))
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT unit_config_name, name, data FROM drop_table
         WHERE unit_config_name = ?1
           AND (name LIKE '{}' OR name IN ({}))
         ORDER BY rowid",
        NORMAL_TABLE_PATTERN, placeholders
    )
}

/// Build a search query with optional filters.
///
/// Returns SQL with named placeholders; the caller binds `:map_type` and
/// `:q` always, `:map_name` and `:limit` when the filter sets them.
///
/// # Arguments
/// * `query` - The filter to apply
/// * `ids_only` - Select only record ids instead of full rows
pub fn build_search_query(query: &SearchQuery, ids_only: bool) -> String {
    let columns = if ids_only { "objid" } else { OBJ_SELECT_COLUMNS };
    let mut sql = format!("SELECT {} FROM objs WHERE map_type = :map_type", columns);

    if query.map_name.is_some() {
        sql.push_str(" AND map_name = :map_name");
    }

    sql.push_str(" AND objid IN (SELECT rowid FROM objs_fts WHERE objs_fts MATCH :q)");
    sql.push_str(" ORDER BY objid");

    if query.limit.is_some() {
        sql.push_str(" LIMIT :limit");
    }

    sql
}
