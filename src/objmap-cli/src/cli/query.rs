//! Query command CLI definitions

use clap::Subcommand;

#[derive(Subcommand)]
pub enum QueryCommand {
    /// Object by record id
    Obj {
        objid: i64,
    },

    /// Object by map partition and hash id
    ObjAt {
        /// Map type (e.g. "MainField")
        map_type: String,

        /// Map name (e.g. "A-1")
        map_name: String,

        hash_id: u32,
    },

    /// Generation group of the object at a map partition and hash id
    GenGroup {
        map_type: String,
        map_name: String,
        hash_id: u32,
    },

    /// Full-text search within a map type
    Search {
        map_type: String,

        /// FTS5 match expression (e.g. "name:Bokoblin")
        q: String,

        /// Restrict to one map name
        #[arg(long)]
        map_name: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,

        /// Include map names in results
        #[arg(long)]
        with_map_names: bool,
    },

    /// Record ids matching a full-text search
    SearchIds {
        map_type: String,

        /// FTS5 match expression
        q: String,

        /// Restrict to one map name
        #[arg(long)]
        map_name: Option<String>,
    },
}
