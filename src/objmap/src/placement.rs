//! Placement map input
//!
//! A map instance is one `(map_type, map_name)` pair in either its static or
//! dynamic variant. [`PlacementSource`] is the seam to whatever parses the
//! game's placement files; [`JsonPlacementSource`] reads the JSON dumps
//! under `content/map/<type>/<name>/`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to scan map directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Static or dynamic half of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapVariant {
    Static,
    Dynamic,
}

impl MapVariant {
    /// Processing order for each map
    pub const ALL: [MapVariant; 2] = [MapVariant::Static, MapVariant::Dynamic];

    pub fn is_static(self) -> bool {
        self == MapVariant::Static
    }
}

impl fmt::Display for MapVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "Static"),
            Self::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// Map partition key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapKey {
    pub map_type: String,
    pub map_name: String,
}

impl MapKey {
    pub fn new(map_type: impl Into<String>, map_name: impl Into<String>) -> Self {
        Self {
            map_type: map_type.into(),
            map_name: map_name.into(),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.map_type, self.map_name)
    }
}

/// Raw placement record as found in the map file.
///
/// Only the fields the indexer reads are typed; everything else is kept in
/// `extra` so the record round-trips into the stored payload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementData {
    #[serde(rename = "HashId")]
    pub hash_id: u32,

    #[serde(rename = "UnitConfigName")]
    pub unit_config_name: String,

    #[serde(
        rename = "!Parameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameters: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlacementData {
    /// A record at the world origin with no parameters
    pub fn new(hash_id: u32, unit_config_name: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("Translate".into(), Value::from(vec![0.0, 0.0, 0.0]));
        Self {
            hash_id,
            unit_config_name: unit_config_name.into(),
            parameters: None,
            extra,
        }
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Hash ids this object links to
    pub fn link_targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.extra
            .get("LinksToObj")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|link| link.get("DestUnitHashId").and_then(Value::as_u64))
            .filter_map(|id| u32::try_from(id).ok())
    }
}

/// One placement object with its generation group assigned
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementObj {
    pub gen_group_id: u32,
    pub data: PlacementData,
}

impl PlacementObj {
    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.data.parameters.as_ref()
    }

    pub fn unit_config_name(&self) -> &str {
        &self.data.unit_config_name
    }
}

/// All placement objects of one map instance
#[derive(Debug, Clone)]
pub struct PlacementMap {
    pub key: MapKey,
    pub variant: MapVariant,
    pub objs: Vec<PlacementObj>,
}

/// Provider of parsed placement maps
pub trait PlacementSource {
    /// Every map partition, in processing order
    fn map_keys(&self) -> Result<Vec<MapKey>, PlacementError>;

    /// Parse one map instance
    fn load(&self, key: &MapKey, variant: MapVariant) -> Result<PlacementMap, PlacementError>;
}

/// Assign generation group ids as connected components of the link graph.
///
/// Links are treated as undirected; links to hash ids outside the map are
/// ignored. Group ids are numbered in order of first appearance.
pub fn assign_gen_groups(objs: &[PlacementData]) -> Vec<u32> {
    let index: HashMap<u32, usize> = objs
        .iter()
        .enumerate()
        .map(|(i, obj)| (obj.hash_id, i))
        .collect();

    let mut parent: Vec<usize> = (0..objs.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for (i, obj) in objs.iter().enumerate() {
        for target in obj.link_targets() {
            if let Some(&j) = index.get(&target) {
                let a = find(&mut parent, i);
                let b = find(&mut parent, j);
                if a != b {
                    parent[b.max(a)] = a.min(b);
                }
            }
        }
    }

    let mut ids: HashMap<usize, u32> = HashMap::new();
    (0..objs.len())
        .map(|i| {
            let root = find(&mut parent, i);
            let next = ids.len() as u32;
            *ids.entry(root).or_insert(next)
        })
        .collect()
}

#[derive(Deserialize)]
struct RawMapFile {
    #[serde(rename = "Objs", default)]
    objs: Vec<PlacementData>,
}

/// Reads `<root>/<type>/<name>/<name>_{Static,Dynamic}.json`
#[derive(Debug, Clone)]
pub struct JsonPlacementSource {
    root: PathBuf,
}

impl JsonPlacementSource {
    /// Source rooted at `<content_dir>/map`
    pub fn from_content_dir<P: AsRef<Path>>(content_dir: P) -> Self {
        Self::new(content_dir.as_ref().join("map"))
    }

    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn map_path(&self, key: &MapKey, variant: MapVariant) -> PathBuf {
        self.root
            .join(&key.map_type)
            .join(&key.map_name)
            .join(format!("{}_{}.json", key.map_name, variant))
    }
}

impl PlacementSource for JsonPlacementSource {
    fn map_keys(&self) -> Result<Vec<MapKey>, PlacementError> {
        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            let map_type = path
                .parent()
                .and_then(Path::file_name)
                .map(|s| s.to_string_lossy().into_owned());
            let map_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(map_type) = map_type {
                keys.push(MapKey::new(map_type, map_name));
            }
        }
        Ok(keys)
    }

    fn load(&self, key: &MapKey, variant: MapVariant) -> Result<PlacementMap, PlacementError> {
        let path = self.map_path(key, variant);
        let content = fs::read_to_string(&path).map_err(|source| PlacementError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: RawMapFile =
            serde_json::from_str(&content).map_err(|source| PlacementError::Json {
                path: path.clone(),
                source,
            })?;

        let groups = assign_gen_groups(&raw.objs);
        let objs = raw
            .objs
            .into_iter()
            .zip(groups)
            .map(|(data, gen_group_id)| PlacementObj { gen_group_id, data })
            .collect();

        Ok(PlacementMap {
            key: key.clone(),
            variant,
            objs,
        })
    }
}
