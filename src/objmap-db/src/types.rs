//! Record types for the object store.
//!
//! These types are shared by the build pipeline, the repository and the
//! query service.

use objmap::DropDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Drop tables keyed by table name
pub type DropTableMap = BTreeMap<String, Value>;

/// One row of the drop table dataset, stored verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTableEntry {
    pub unit_config_name: String,
    #[serde(rename = "name")]
    pub table_name: String,
    #[serde(default)]
    pub data: Value,
}

impl DropTableEntry {
    pub fn new(unit_config_name: &str, table_name: &str, data: Value) -> Self {
        Self {
            unit_config_name: unit_config_name.to_string(),
            table_name: table_name.to_string(),
            data,
        }
    }
}

/// Merge drop table rows into a map keyed by table name.
///
/// Returns `None` when there are no rows. Duplicate names keep the last row.
pub fn merge_drop_tables(rows: Vec<DropTableEntry>) -> Option<DropTableMap> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.into_iter()
            .map(|row| (row.table_name, row.data))
            .collect(),
    )
}

/// A stored placement object with its derived attributes
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the objs table columns
pub struct ObjRecord {
    pub objid: i64,
    pub map_type: String,
    pub map_name: String,
    pub map_static: bool,
    pub gen_group: u32,
    pub hash_id: u32,
    pub unit_config_name: String,
    pub ui_name: String,
    pub data: Value,
    pub one_hit_mode: bool,
    pub last_boss_mode: bool,
    pub hard_mode: bool,
    pub disable_rankup_for_hard_mode: bool,
    pub scale: Option<i64>,
    pub sharp_weapon_judge_type: Option<i64>,
    /// `None` when the object was stored without parameters
    pub drop: Option<DropDescriptor>,
    pub equip: Option<Vec<String>>,
    pub ui_drop: Option<String>,
    pub ui_equip: Option<String>,
    pub messageid: Option<String>,
}

impl ObjRecord {
    /// Placement parameters from the raw payload
    pub fn params(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.get("!Parameters").and_then(Value::as_object)
    }

    /// Drop descriptor, treating "no parameters" as no drop
    pub fn drop_descriptor(&self) -> &DropDescriptor {
        static NONE: DropDescriptor = DropDescriptor::None;
        self.drop.as_ref().unwrap_or(&NONE)
    }

    /// Rounded 2-D map position (X, Z)
    pub fn pos(&self) -> Option<[f64; 2]> {
        let translate = self.data.get("Translate")?.as_array()?;
        let x = translate.first()?.as_f64()?;
        let z = translate.get(2)?.as_f64()?;
        Some([round2(x), round2(z)])
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Filtered full-text search over one map type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub map_type: String,
    pub map_name: Option<String>,
    /// FTS5 match expression
    pub text: Option<String>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(map_type: &str) -> Self {
        Self {
            map_type: map_type.to_string(),
            ..Default::default()
        }
    }

    pub fn map_name(mut self, map_name: Option<&str>) -> Self {
        self.map_name = map_name.map(str::to_string);
        self
    }

    pub fn text(mut self, text: Option<&str>) -> Self {
        self.text = text.map(str::to_string);
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Match expression, if one was given and is not blank
    pub fn match_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Queries without a map type or match text return nothing
    pub fn is_runnable(&self) -> bool {
        !self.map_type.is_empty() && self.match_text().is_some()
    }
}

/// How much of each record a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Everything, including the raw payload
    #[default]
    Full,
    /// Without the raw payload; map name only if requested
    Minimal { with_map_names: bool },
}

/// A record as served to callers, with drop tables resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)] // One field per game mode flag
pub struct ObjView {
    pub objid: i64,
    pub map_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_name: Option<String>,
    pub map_static: bool,
    pub gen_group: u32,
    pub hash_id: u32,
    #[serde(rename = "name")]
    pub unit_config_name: String,
    pub ui_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop: Option<DropDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equip: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messageid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharp_weapon_judge_type: Option<i64>,
    pub one_hit_mode: bool,
    pub last_boss_mode: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hard_mode: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_rankup_for_hard_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_table: Option<DropTableMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_tables: Option<DropTableMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
}

impl ObjView {
    pub fn new(
        record: ObjRecord,
        drop_table: Option<DropTableMap>,
        drop_tables: Option<DropTableMap>,
    ) -> Self {
        let pos = record.pos();
        let drop = match record.drop {
            Some(DropDescriptor::None) | None => None,
            some => some,
        };
        let equip = record.equip.filter(|e| !e.is_empty());
        Self {
            objid: record.objid,
            map_type: record.map_type,
            map_name: Some(record.map_name),
            map_static: record.map_static,
            gen_group: record.gen_group,
            hash_id: record.hash_id,
            unit_config_name: record.unit_config_name,
            ui_name: record.ui_name,
            drop,
            equip,
            data: Some(record.data),
            messageid: record.messageid,
            scale: record.scale,
            sharp_weapon_judge_type: record.sharp_weapon_judge_type,
            one_hit_mode: record.one_hit_mode,
            last_boss_mode: record.last_boss_mode,
            hard_mode: record.hard_mode,
            disable_rankup_for_hard_mode: record.disable_rankup_for_hard_mode,
            drop_table,
            drop_tables,
            pos,
        }
    }

    /// Strip fields according to the projection
    pub fn project(mut self, projection: Projection) -> Self {
        if let Projection::Minimal { with_map_names } = projection {
            self.data = None;
            if !with_map_names {
                self.map_name = None;
            }
        }
        self
    }
}

/// Counters reported by a store build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub map_instances: usize,
    pub objs: usize,
    pub drop_table_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ObjRecord {
        ObjRecord {
            objid: 1,
            map_type: "MainField".into(),
            map_name: "A-1".into(),
            map_static: true,
            gen_group: 0,
            hash_id: 100,
            unit_config_name: "Enemy_Bokoblin_Junior".into(),
            ui_name: "Bokoblin".into(),
            data: json!({"HashId": 100, "Translate": [1.234, 5.0, -7.891]}),
            one_hit_mode: false,
            last_boss_mode: false,
            hard_mode: false,
            disable_rankup_for_hard_mode: false,
            scale: Some(0),
            sharp_weapon_judge_type: Some(0),
            drop: Some(DropDescriptor::None),
            equip: Some(vec![]),
            ui_drop: Some(String::new()),
            ui_equip: Some(String::new()),
            messageid: None,
        }
    }

    #[test]
    fn test_merge_drop_tables() {
        assert_eq!(merge_drop_tables(vec![]), None);
        let merged = merge_drop_tables(vec![
            DropTableEntry::new("Enemy_Bokoblin_Junior", "Normal", json!({"a": 1})),
            DropTableEntry::new("Enemy_Bokoblin_Junior", "Rare", json!({"b": 2})),
            DropTableEntry::new("Enemy_Bokoblin_Junior", "Rare", json!({"c": 3})),
        ])
        .unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["Rare"], json!({"c": 3}));
    }

    #[test]
    fn test_drop_table_entry_file_format() {
        let entry: DropTableEntry = serde_json::from_value(json!({
            "unit_config_name": "Enemy_Bokoblin_Junior",
            "name": "Normal",
            "data": {"items": {"Item_Enemy_00": 1.0}}
        }))
        .unwrap();
        assert_eq!(entry.table_name, "Normal");
    }

    #[test]
    fn test_pos_rounds_x_and_z() {
        assert_eq!(record().pos(), Some([1.23, -7.89]));
        let mut r = record();
        r.data = json!({"Translate": [1.0]});
        assert_eq!(r.pos(), None);
    }

    #[test]
    fn test_view_omits_empty_fields() {
        let view = ObjView::new(record(), None, None);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("drop").is_none());
        assert!(json.get("equip").is_none());
        assert!(json.get("hard_mode").is_none());
        assert_eq!(json["name"], "Enemy_Bokoblin_Junior");
        assert_eq!(json["pos"], json!([1.23, -7.89]));
    }

    #[test]
    fn test_minimal_projection() {
        let view = ObjView::new(record(), None, None);
        let minimal = view.clone().project(Projection::Minimal {
            with_map_names: false,
        });
        assert!(minimal.data.is_none());
        assert!(minimal.map_name.is_none());

        let with_names = view.clone().project(Projection::Minimal {
            with_map_names: true,
        });
        assert_eq!(with_names.map_name.as_deref(), Some("A-1"));

        assert_eq!(view.clone().project(Projection::Full), view);
    }

    #[test]
    fn test_search_query_runnable() {
        assert!(!SearchQuery::new("MainField").is_runnable());
        assert!(!SearchQuery::new("MainField").text(Some("  ")).is_runnable());
        assert!(!SearchQuery::new("").text(Some("Bokoblin")).is_runnable());
        assert!(SearchQuery::new("MainField").text(Some("Bokoblin")).is_runnable());
    }
}
