//! Actor profile lookup.
//!
//! The actor info table ships as two parallel arrays: CRC-32 checksums of
//! actor names sorted ascending, and the profile records at the same
//! positions. Lookups hash the name and binary search the checksum array.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActorInfoError {
    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Malformed actor info table: {0}")]
    Malformed(String),
}

/// Static profile metadata for one actor type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActorProfile {
    /// Profile category (e.g. "Enemy", "NPC", "MapConstActive")
    #[serde(default)]
    pub profile: String,

    /// Remaining profile fields, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActorProfile {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawActorInfo {
    #[serde(rename = "Hashes")]
    hashes: Vec<u32>,
    #[serde(rename = "Actors")]
    actors: Vec<ActorProfile>,
}

/// Sorted checksum table with parallel profile records
#[derive(Debug, Clone, Default)]
pub struct ActorInfoTable {
    hashes: Vec<u32>,
    actors: Vec<ActorProfile>,
}

/// CRC-32 of an actor name, as stored in the checksum array
pub fn actor_hash(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

impl ActorInfoTable {
    /// Build a table from parallel arrays.
    ///
    /// The arrays must have the same length and the checksums must be
    /// sorted ascending, otherwise binary search would silently miss.
    pub fn new(hashes: Vec<u32>, actors: Vec<ActorProfile>) -> Result<Self, ActorInfoError> {
        if hashes.len() != actors.len() {
            return Err(ActorInfoError::Malformed(format!(
                "{} hashes but {} actors",
                hashes.len(),
                actors.len()
            )));
        }
        if let Some(pos) = hashes.windows(2).position(|w| w[0] > w[1]) {
            return Err(ActorInfoError::Malformed(format!(
                "hashes not sorted at index {}",
                pos + 1
            )));
        }
        Ok(Self { hashes, actors })
    }

    /// Build a table from (name, profile) pairs, hashing and sorting them
    pub fn from_named<I, S>(entries: I) -> Result<Self, ActorInfoError>
    where
        I: IntoIterator<Item = (S, ActorProfile)>,
        S: AsRef<str>,
    {
        let mut pairs: Vec<(u32, ActorProfile)> = entries
            .into_iter()
            .map(|(name, profile)| (actor_hash(name.as_ref()), profile))
            .collect();
        pairs.sort_by_key(|(hash, _)| *hash);
        let (hashes, actors) = pairs.into_iter().unzip();
        Self::new(hashes, actors)
    }

    /// Parse the `{"Hashes": [...], "Actors": [...]}` JSON document
    pub fn from_json(json: &str) -> Result<Self, ActorInfoError> {
        let raw: RawActorInfo =
            serde_json::from_str(json).map_err(|e| ActorInfoError::Malformed(e.to_string()))?;
        Self::new(raw.hashes, raw.actors)
    }

    /// Look up an actor's profile by name
    pub fn lookup(&self, name: &str) -> Result<&ActorProfile, ActorInfoError> {
        let hash = actor_hash(name);
        self.hashes
            .binary_search(&hash)
            .map(|idx| &self.actors[idx])
            .map_err(|_| ActorInfoError::UnknownActor(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
