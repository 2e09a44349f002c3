//! Tile world
//!
//! Layered tilemaps and the tilesets that give their ids an image.
//! Both are built once at world load and are read-only afterwards.

mod tilemap;
mod tileset;

pub use tilemap::*;
pub use tileset::*;

use thiserror::Error;

use crate::asset::AssetError;

/// Everything that can go wrong while building or querying a tilemap
#[derive(Debug, Error)]
pub enum TilemapError {
    /// Structural problem in the tilemap definition
    #[error("malformed tilemap: {0}")]
    Malformed(String),
    /// No tileset range covers this id
    #[error("unknown tile id {0}")]
    UnknownTileId(u32),
    /// Id falls in a per-tile tileset but past (or before) its image list
    #[error("tile id {gid} maps to index {local} of a {len}-image tileset")]
    IndexOutOfRange { gid: u32, local: i64, len: usize },
    /// An image or document behind a tileset could not be loaded
    #[error("failed to load tileset at gid {first_gid}: {source}")]
    TilesetLoad {
        first_gid: u32,
        #[source]
        source: AssetError,
    },
    /// Tileset definition has no recognizable shape
    #[error("invalid tileset at gid {first_gid}: {reason}")]
    InvalidTileset { first_gid: u32, reason: String },
    /// The tilemap document itself could not be read or parsed
    #[error(transparent)]
    Asset(#[from] AssetError),
}
