//! # objmap
//!
//! Placement map classification for the object map indexer.
//!
//! This library provides:
//! - Actor profile lookup by name checksum
//! - Reference data loading (UI names, location and dungeon texts)
//! - The placement map input seam and a JSON placement source
//! - Derivation rules for display names, drops, equipment and mode flags
//! - Generation group analysis for last boss mode
//!
//! ## Example
//!
//! ```no_run
//! use objmap::{DerivedAttributes, GenGroupAnalysis, JsonPlacementSource, MapVariant,
//!     PlacementSource, ReferenceData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let refs = ReferenceData::load("content")?;
//! let source = JsonPlacementSource::from_content_dir("content");
//!
//! for key in source.map_keys()? {
//!     let map = source.load(&key, MapVariant::Static)?;
//!     let groups = GenGroupAnalysis::for_last_boss_mode(&map.objs, &refs);
//!     for obj in &map.objs {
//!         let derived = DerivedAttributes::derive(obj, &refs);
//!         println!("{} {} {}", obj.data.hash_id, derived.ui_name,
//!             groups.last_boss_mode(obj.gen_group_id));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod actor_info;
pub mod derive;
pub mod gen_group;
pub mod placement;
pub mod reference;

#[doc(inline)]
pub use actor_info::{actor_hash, ActorInfoError, ActorInfoTable, ActorProfile};
#[doc(inline)]
pub use derive::{
    equipment, is_truthy, should_spawn_in_last_boss_mode, DerivedAttributes, DropDescriptor,
    NORMAL_DROP_TABLE,
};
#[doc(inline)]
pub use gen_group::GenGroupAnalysis;
#[doc(inline)]
pub use placement::{
    JsonPlacementSource, MapKey, MapVariant, PlacementData, PlacementError, PlacementMap,
    PlacementObj, PlacementSource,
};
#[doc(inline)]
pub use reference::{ReferenceData, ReferenceError};
