//! Derived attributes for placement objects
//!
//! Pure classification rules that turn a raw placement record into the
//! labels, flags and summaries stored next to it. The only inputs besides
//! the record are the in-memory reference datasets.

use crate::actor_info::ActorInfoError;
use crate::placement::PlacementObj;
use crate::reference::ReferenceData;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Actor whose UI name comes from the message tables
pub const LOCATION_TAG_ACTOR: &str = "LocationTag";

/// Profile categories excluded from last boss mode
pub const LAST_BOSS_EXCLUDED_PROFILES: &[&str] =
    &["Enemy", "GelEnemy", "SandWorm", "Prey", "Dragon", "Guardian"];

/// Boss actor exempt from the profile exclusion
pub const LAST_BOSS_EXEMPT_ACTOR: &str = "Enemy_GanonBeast";

/// Actor that never spawns in last boss mode regardless of profile
pub const LAST_BOSS_EXCLUDED_ACTOR: &str = "Enemy_Guardian_A";

/// Name fragments marking entrances, warps and terminals
pub const LAST_BOSS_EXCLUDED_NAME_TOKENS: &[&str] = &["Entrance", "WarpPoint", "Terminal"];

/// Parameter keys scanned for equipment, in output order
pub const EQUIP_PARAMS: &[&str] = &[
    "EquipItem1",
    "EquipItem2",
    "EquipItem3",
    "EquipItem4",
    "EquipItem5",
    "RideHorseName",
];

/// Equipment slot value meaning "nothing special"
pub const DEFAULT_EQUIP: &str = "Default";
/// Arrow type every archer carries unless overridden
pub const DEFAULT_ARROW: &str = "NormalArrow";
/// Drop table name that denotes the actor's ordinary table
pub const NORMAL_DROP_TABLE: &str = "Normal";

/// What an object drops on defeat or destruction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DropDescriptor {
    /// Drops one specific actor; no table lookup applies
    Actor(String),
    /// Drops from a named table registered for the object's actor
    Table(String),
    #[default]
    None,
}

const ACTOR_DROP_TAG: u8 = 1;
const TABLE_DROP_TAG: u8 = 2;

impl DropDescriptor {
    /// Derive the descriptor from placement parameters
    pub fn from_params(params: &Map<String, Value>) -> Self {
        if let Some(actor) = truthy_str(params, "DropActor") {
            return Self::Actor(actor.to_string());
        }
        match truthy_str(params, "DropTable") {
            Some(table) if table != NORMAL_DROP_TABLE => Self::Table(table.to_string()),
            _ => Self::None,
        }
    }

    pub fn is_actor(&self) -> bool {
        matches!(self, Self::Actor(_))
    }

    pub fn table_name(&self) -> Option<&str> {
        match self {
            Self::Table(name) => Some(name),
            _ => None,
        }
    }
}

// Stored as `[1, "<actor>"]`, `[2, "<table>"]` or `null`
impl Serialize for DropDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (tag, name) = match self {
            Self::Actor(name) => (ACTOR_DROP_TAG, name),
            Self::Table(name) => (TABLE_DROP_TAG, name),
            Self::None => return serializer.serialize_none(),
        };
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&tag)?;
        tuple.serialize_element(name)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for DropDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<(u8, String)>::deserialize(deserializer)? {
            None => Ok(Self::None),
            Some((ACTOR_DROP_TAG, name)) => Ok(Self::Actor(name)),
            Some((TABLE_DROP_TAG, name)) => Ok(Self::Table(name)),
            Some((tag, _)) => Err(de::Error::custom(format!("unknown drop tag {}", tag))),
        }
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn flag(params: Option<&Map<String, Value>>, key: &str) -> bool {
    params.and_then(|p| p.get(key)).is_some_and(is_truthy)
}

fn truthy_str<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Whether the actor's profile places it in the excluded categories.
///
/// Lookup misses surface as errors; callers decide how to treat them.
pub fn has_excluded_profile(name: &str, refs: &ReferenceData) -> Result<bool, ActorInfoError> {
    if name == LAST_BOSS_EXEMPT_ACTOR {
        return Ok(false);
    }
    let info = refs.actor_info.lookup(name)?;
    Ok(LAST_BOSS_EXCLUDED_PROFILES.contains(&info.profile.as_str())
        || info.profile.contains("NPC"))
}

/// Whether an object may spawn in last boss mode.
///
/// Actors missing from the actor info table are treated as ineligible.
pub fn should_spawn_in_last_boss_mode(name: &str, refs: &ReferenceData) -> bool {
    match has_excluded_profile(name, refs) {
        Ok(true) => return false,
        Ok(false) => {}
        Err(e) => {
            tracing::warn!("{}; treating as ineligible for last boss mode", e);
            return false;
        }
    }
    if name == LAST_BOSS_EXCLUDED_ACTOR {
        return false;
    }
    !LAST_BOSS_EXCLUDED_NAME_TOKENS
        .iter()
        .any(|token| name.contains(token))
}

/// Non-default equipment carried by an object
pub fn equipment(params: &Map<String, Value>) -> Vec<String> {
    let mut equip: Vec<String> = EQUIP_PARAMS
        .iter()
        .filter_map(|key| params.get(*key).and_then(Value::as_str))
        .filter(|item| *item != DEFAULT_EQUIP)
        .map(str::to_string)
        .collect();

    if let Some(arrow) = truthy_str(params, "ArrowName") {
        if arrow != DEFAULT_ARROW {
            equip.push(arrow.to_string());
        }
    }
    equip
}

/// Human-readable equipment summary
pub fn ui_equipment(params: &Map<String, Value>, refs: &ReferenceData) -> String {
    equipment(params)
        .iter()
        .map(|item| refs.ui_name(item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable drop summary
pub fn ui_drop(params: &Map<String, Value>, refs: &ReferenceData) -> String {
    match DropDescriptor::from_params(params) {
        DropDescriptor::Actor(actor) => refs.ui_name(&actor).to_string(),
        DropDescriptor::Table(table) => format!("Table:{}", table),
        DropDescriptor::None => String::new(),
    }
}

/// Display name for an object
pub fn ui_name(obj: &PlacementObj, refs: &ReferenceData) -> String {
    let name = obj.unit_config_name();
    if name == LOCATION_TAG_ACTOR {
        if let Some(id) = obj.params().and_then(|p| truthy_str(p, "MessageID")) {
            let location = refs.location_text(id).unwrap_or(id);
            let mut label = format!("Location: {}", location);
            if let Some(sub) = refs.dungeon_subtitle(id) {
                label.push_str(" - ");
                label.push_str(sub);
            }
            return label;
        }
    }
    refs.ui_name(name).to_string()
}

fn param_i64(params: &Map<String, Value>, key: &str) -> Option<i64> {
    params.get(key).and_then(Value::as_i64)
}

/// Level scaling mode; only meaningful for weapons and enemies
pub fn scale(name: &str, params: Option<&Map<String, Value>>) -> Option<i64> {
    if !name.starts_with("Weapon_") && !name.starts_with("Enemy_") {
        return None;
    }
    match params {
        Some(p) => param_i64(p, "LevelSensorMode"),
        None => Some(0),
    }
}

/// Weapon bonus judge type
pub fn sharp_weapon_judge_type(params: Option<&Map<String, Value>>) -> Option<i64> {
    match params {
        Some(p) => param_i64(p, "SharpWeaponJudgeType"),
        None => Some(0),
    }
}

/// Attributes computed for one placement object at build time.
///
/// `last_boss_mode` is not here: it is a property of the whole generation
/// group, see [`crate::gen_group`].
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)] // One column per game mode flag
pub struct DerivedAttributes {
    pub ui_name: String,
    pub one_hit_mode: bool,
    pub hard_mode: bool,
    pub disable_rankup_for_hard_mode: bool,
    pub scale: Option<i64>,
    pub sharp_weapon_judge_type: Option<i64>,
    /// `None` when the object has no parameters at all
    pub drop: Option<DropDescriptor>,
    pub equip: Option<Vec<String>>,
    pub ui_drop: Option<String>,
    pub ui_equip: Option<String>,
    pub messageid: Option<String>,
}

impl DerivedAttributes {
    pub fn derive(obj: &PlacementObj, refs: &ReferenceData) -> Self {
        let name = obj.unit_config_name();
        let params = obj.params();

        Self {
            ui_name: ui_name(obj, refs),
            one_hit_mode: flag(params, "IsIchigekiActor"),
            hard_mode: flag(params, "IsHardModeActor"),
            disable_rankup_for_hard_mode: flag(params, "DisableRankUpForHardMode"),
            scale: scale(name, params),
            sharp_weapon_judge_type: sharp_weapon_judge_type(params),
            drop: params.map(DropDescriptor::from_params),
            equip: params.map(equipment),
            ui_drop: params.map(|p| ui_drop(p, refs)),
            ui_equip: params.map(|p| ui_equipment(p, refs)),
            messageid: params
                .and_then(|p| truthy_str(p, "MessageID"))
                .map(str::to_string),
        }
    }
}
