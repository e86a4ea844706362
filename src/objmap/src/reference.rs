//! Reference datasets loaded once before a build
//!
//! Actor profiles, UI labels and message texts are read from the game
//! content directory and held immutably for the rest of the process.

use crate::actor_info::{ActorInfoError, ActorInfoTable};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Actor info file, relative to the content directory
pub const ACTOR_INFO_PATH: &str = "ActorInfo.product.json";
/// Actor name → UI label file
pub const NAMES_PATH: &str = "names.json";
/// Location marker texts, keyed by message id
pub const LOCATION_MARKER_TEXT_PATH: &str = "text/StaticMsg/LocationMarker.json";
/// Dungeon texts, keyed by message id
pub const DUNGEON_TEXT_PATH: &str = "text/StaticMsg/Dungeon.json";

#[derive(Error, Debug)]
pub enum ReferenceError {
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

    #[error(transparent)]
    ActorInfo(#[from] ActorInfoError),
}

/// Immutable lookup data shared by every derivation rule
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub actor_info: ActorInfoTable,
    pub names: HashMap<String, String>,
    pub location_marker_texts: HashMap<String, String>,
    pub dungeon_texts: HashMap<String, String>,
}

fn read_file(path: &Path) -> Result<String, ReferenceError> {
    fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReferenceError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| ReferenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl ReferenceData {
    /// Load all reference datasets from a content directory
    pub fn load<P: AsRef<Path>>(content_dir: P) -> Result<Self, ReferenceError> {
        let dir = content_dir.as_ref();

        let actor_info = ActorInfoTable::from_json(&read_file(&dir.join(ACTOR_INFO_PATH))?)?;
        let names = read_json(&dir.join(NAMES_PATH))?;
        let location_marker_texts = read_json(&dir.join(LOCATION_MARKER_TEXT_PATH))?;
        let dungeon_texts = read_json(&dir.join(DUNGEON_TEXT_PATH))?;

        tracing::info!(
            actors = actor_info.len(),
            "Loaded reference data from {}",
            dir.display()
        );

        Ok(Self {
            actor_info,
            names,
            location_marker_texts,
            dungeon_texts,
        })
    }

    /// UI label for an actor name, falling back to the name itself
    pub fn ui_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Location text for a message id: location markers first, then dungeons
    pub fn location_text(&self, message_id: &str) -> Option<&str> {
        self.location_marker_texts
            .get(message_id)
            .or_else(|| self.dungeon_texts.get(message_id))
            .map(String::as_str)
    }

    /// Dungeon subtitle (`<id>_sub`) for a message id
    pub fn dungeon_subtitle(&self, message_id: &str) -> Option<&str> {
        self.dungeon_texts
            .get(&format!("{}_sub", message_id))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_info::actor_hash;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_content_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        write(
            dir,
            ACTOR_INFO_PATH,
            &format!(
                r#"{{"Hashes": [{}], "Actors": [{{"profile": "Enemy"}}]}}"#,
                actor_hash("Enemy_Bokoblin_Junior")
            ),
        );
        write(dir, NAMES_PATH, r#"{"Enemy_Bokoblin_Junior": "Bokoblin"}"#);
        write(dir, LOCATION_MARKER_TEXT_PATH, r#"{"Village_1": "Hateno Village"}"#);
        write(
            dir,
            DUNGEON_TEXT_PATH,
            r#"{"Dungeon000": "Ja Baij Shrine", "Dungeon000_sub": "The Bombs Trial"}"#,
        );

        let refs = ReferenceData::load(dir).unwrap();
        assert_eq!(refs.ui_name("Enemy_Bokoblin_Junior"), "Bokoblin");
        assert_eq!(refs.ui_name("Obj_Unknown"), "Obj_Unknown");
        assert_eq!(refs.location_text("Village_1"), Some("Hateno Village"));
        assert_eq!(refs.location_text("Dungeon000"), Some("Ja Baij Shrine"));
        assert_eq!(refs.dungeon_subtitle("Dungeon000"), Some("The Bombs Trial"));
        assert_eq!(refs.dungeon_subtitle("Village_1"), None);
        assert!(refs.actor_info.lookup("Enemy_Bokoblin_Junior").is_ok());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = ReferenceData::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ReferenceError::Io { .. }));
    }

    #[test]
    fn test_location_marker_text_takes_precedence() {
        let mut refs = ReferenceData::default();
        refs.location_marker_texts
            .insert("Tower01".into(), "Great Plateau Tower".into());
        refs.dungeon_texts.insert("Tower01".into(), "Shadowed".into());
        assert_eq!(refs.location_text("Tower01"), Some("Great Plateau Tower"));
    }
}
