//! Repository trait for object store reads.
//!
//! The store is written once by the build pipeline and only read
//! afterwards, so the trait has no mutating operations.

use crate::types::*;
use objmap::{PlacementError, ReferenceError};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Placement map error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceError),
}

impl From<rusqlite::Error> for RepoError {
    fn from(e: rusqlite::Error) -> Self {
        RepoError::Database(e.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Read access to stored placement objects and drop tables
pub trait ObjRepository {
    /// Get an object by record id
    fn get_obj(&self, objid: i64) -> RepoResult<Option<ObjRecord>>;

    /// Get an object by map partition and hash id.
    ///
    /// Hash ids are unique per map instance; if both the static and dynamic
    /// variant hold the id, the first stored record wins.
    fn get_obj_by_hash(
        &self,
        map_type: &str,
        map_name: &str,
        hash_id: u32,
    ) -> RepoResult<Option<ObjRecord>>;

    /// All objects in the same map instance and generation group as `obj`
    fn get_gen_group(&self, obj: &ObjRecord) -> RepoResult<Vec<ObjRecord>>;

    /// Objects matching a full-text search
    fn search(&self, query: &SearchQuery) -> RepoResult<Vec<ObjRecord>>;

    /// Record ids matching a full-text search
    fn search_ids(&self, query: &SearchQuery) -> RepoResult<Vec<i64>>;

    /// Drop table rows for an actor whose name is `Normal*` or in `table_names`
    fn find_drop_tables(
        &self,
        unit_config_name: &str,
        table_names: &[String],
    ) -> RepoResult<Vec<DropTableEntry>>;

    /// Every drop table row registered for an actor
    fn all_drop_tables(&self, unit_config_name: &str) -> RepoResult<Vec<DropTableEntry>>;
}
