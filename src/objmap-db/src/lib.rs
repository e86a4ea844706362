//! Object store for the object map indexer
//!
//! This library builds a SQLite store of placement objects with derived
//! attributes and a full-text index, and serves read-only queries over it
//! with drop tables resolved at read time.
//!
//! # Example
//!
//! ```no_run
//! use objmap::{JsonPlacementSource, ReferenceData};
//! use objmap_db::{load_drop_table, QueryService, SqliteDb, StoreBuilder};
//!
//! let refs = ReferenceData::load("content").unwrap();
//! let source = JsonPlacementSource::from_content_dir("content");
//! let drops = load_drop_table("drop_table.json").unwrap();
//! StoreBuilder::new(&source, &refs, &drops).build("map.db").unwrap();
//!
//! let db = SqliteDb::open_read_only("map.db").unwrap();
//! let service = QueryService::new(&db);
//! let ids = service.search_ids("MainField", None, Some("Bokoblin")).unwrap();
//! ```

pub mod pipeline;
pub mod repository;
pub mod resolve;
pub mod service;
pub mod shared;
pub mod sqlite;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export types
pub use types::*;

pub use pipeline::{load_drop_table, StoreBuilder};
pub use repository::{ObjRepository, RepoError, RepoResult};
pub use service::QueryService;
pub use sqlite::{SqliteDb, DEFAULT_DB_PATH};
