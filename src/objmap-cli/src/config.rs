//! Configuration management for the objmap CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding reference data and placement maps
    pub content_dir: PathBuf,
    /// Drop table dataset
    pub drop_table: PathBuf,
    /// Published store
    pub database: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            drop_table: PathBuf::from("drop_table.json"),
            database: PathBuf::from(objmap_db::DEFAULT_DB_PATH),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("objmap");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or the defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Database path, preferring an explicit override
    pub fn database_or(&self, path: Option<PathBuf>) -> PathBuf {
        path.unwrap_or_else(|| self.database.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, PathBuf::from("map.db"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "content_dir = \"/srv/botw/content\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("/srv/botw/content"));
        assert_eq!(config.drop_table, PathBuf::from("drop_table.json"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "content_dir = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_database_override() {
        let config = Config::default();
        assert_eq!(
            config.database_or(Some(PathBuf::from("other.db"))),
            PathBuf::from("other.db")
        );
        assert_eq!(config.database_or(None), PathBuf::from("map.db"));
    }
}
