//! Shared test fixtures: a small in-memory placement world.

use crate::pipeline::StoreBuilder;
use crate::sqlite::SqliteDb;
use crate::types::{BuildStats, DropTableEntry};
use objmap::{
    ActorInfoTable, ActorProfile, MapKey, MapVariant, PlacementData, PlacementError, PlacementMap,
    PlacementObj, PlacementSource, ReferenceData,
};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

/// Placement source over in-memory maps
pub(crate) struct FixedSource {
    pub maps: Vec<(MapKey, MapVariant, Vec<PlacementObj>)>,
    pub fail_on: Option<MapKey>,
}

impl PlacementSource for FixedSource {
    fn map_keys(&self) -> Result<Vec<MapKey>, PlacementError> {
        let mut keys: Vec<MapKey> = self.maps.iter().map(|(k, _, _)| k.clone()).collect();
        keys.dedup();
        Ok(keys)
    }

    fn load(&self, key: &MapKey, variant: MapVariant) -> Result<PlacementMap, PlacementError> {
        if self.fail_on.as_ref() == Some(key) {
            return Err(PlacementError::Io {
                path: PathBuf::from(format!("{}_{}.json", key.map_name, variant)),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        let objs = self
            .maps
            .iter()
            .find(|(k, v, _)| k == key && *v == variant)
            .map(|(_, _, objs)| objs.clone())
            .unwrap_or_default();
        Ok(PlacementMap {
            key: key.clone(),
            variant,
            objs,
        })
    }
}

pub(crate) fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("params must be an object"),
    }
}

pub(crate) fn obj(hash_id: u32, group: u32, name: &str, p: Option<Value>) -> PlacementObj {
    let data = match p {
        Some(p) => PlacementData::new(hash_id, name).with_parameters(params(p)),
        None => PlacementData::new(hash_id, name),
    };
    PlacementObj {
        gen_group_id: group,
        data,
    }
}

pub(crate) fn refs() -> ReferenceData {
    let mut refs = ReferenceData {
        actor_info: ActorInfoTable::from_named([
            ("Enemy_Bokoblin_Junior", ActorProfile::new("Enemy")),
            ("TBox_Field_Wood", ActorProfile::new("TBox")),
            ("Obj_TreeApple_A_01", ActorProfile::new("MapConstPassive")),
        ])
        .unwrap(),
        ..Default::default()
    };
    refs.names
        .insert("Enemy_Bokoblin_Junior".into(), "Bokoblin".into());
    refs
}

pub(crate) fn source() -> FixedSource {
    let a1 = MapKey::new("MainField", "A-1");
    FixedSource {
        maps: vec![
            (
                a1.clone(),
                MapVariant::Static,
                vec![
                    obj(
                        100,
                        0,
                        "Enemy_Bokoblin_Junior",
                        Some(json!({"DropTable": "Rare", "EquipItem1": "Weapon_Sword_001"})),
                    ),
                    obj(101, 0, "TBox_Field_Wood", Some(json!({"DropActor": "Item_Fruit_A"}))),
                    obj(102, 1, "Obj_TreeApple_A_01", None),
                ],
            ),
            (
                a1,
                MapVariant::Dynamic,
                vec![obj(200, 0, "Obj_TreeApple_A_01", None)],
            ),
        ],
        fail_on: None,
    }
}

pub(crate) fn drop_rows() -> Vec<DropTableEntry> {
    vec![
        DropTableEntry::new("Enemy_Bokoblin_Junior", "Normal", json!({"Item_Enemy_00": 1})),
        DropTableEntry::new("Enemy_Bokoblin_Junior", "Rare", json!({"Item_Enemy_01": 1})),
    ]
}

pub(crate) fn built_db() -> (SqliteDb, BuildStats) {
    let refs = refs();
    let source = source();
    let drops = drop_rows();
    let mut conn = Connection::open_in_memory().unwrap();
    let stats = StoreBuilder::new(&source, &refs, &drops)
        .populate(&mut conn)
        .unwrap();
    (SqliteDb::from_connection(conn), stats)
}
