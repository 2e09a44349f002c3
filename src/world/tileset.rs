//! Tileset Resolver
//!
//! Maps a global tile id to the image and pixel region to draw.
//!
//! Two atlas shapes exist:
//! - Uniform: one sheet sliced into a fixed-column virtual grid of 16px tiles
//! - Dynamic: one whole, independently sized image per tile id (irregular
//!   pieces such as multi-tile buildings)
//!
//! Which shape a tileset has is decided from the structure of its
//! definition, never from its file name.

use serde::Deserialize;
use tracing::debug;

use crate::asset::{AssetRoot, ImageHandle, ImageProvider, SourceRect};
use crate::constants::{DEFAULT_ATLAS_COLUMNS, TILE_SIZE_PX};
use super::TilemapError;

// =============================================================================
// Definition format
// =============================================================================

/// Tileset body as stored in a tilemap or a standalone tileset document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TilesetDef {
    /// Sheet image (uniform tilesets)
    #[serde(default)]
    pub image: Option<String>,
    /// Grid width of the sheet, in tiles
    #[serde(default)]
    pub columns: Option<u32>,
    /// Number of tiles in the sheet; unbounded if absent
    #[serde(default)]
    pub tilecount: Option<u32>,
    /// Per-tile images (dynamic tilesets)
    #[serde(default)]
    pub tiles: Option<Vec<TileDef>>,
}

/// One entry of a per-tile image list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileDef {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub imagewidth: Option<u32>,
    #[serde(default)]
    pub imageheight: Option<u32>,
}

/// Structural shape of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilesetShape {
    Uniform,
    Dynamic,
}

impl TilesetDef {
    /// Classify the definition.
    ///
    /// A non-empty `tiles` array whose entries all carry an image is a
    /// dynamic tileset. Otherwise a sheet `image` makes it uniform (sheets
    /// may still list per-tile metadata without images).
    pub fn shape(&self) -> Option<TilesetShape> {
        let per_tile_images = self
            .tiles
            .as_ref()
            .is_some_and(|tiles| !tiles.is_empty() && tiles.iter().all(|t| t.image.is_some()));
        if per_tile_images {
            Some(TilesetShape::Dynamic)
        } else if self.image.is_some() {
            Some(TilesetShape::Uniform)
        } else {
            None
        }
    }
}

// =============================================================================
// Resolved tilesets
// =============================================================================

/// The image and region a tile id resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileImage {
    pub image: ImageHandle,
    pub source: SourceRect,
}

#[derive(Debug, Clone)]
pub enum TilesetKind {
    Uniform {
        image: ImageHandle,
        columns: u32,
        tile_count: Option<u32>,
    },
    Dynamic {
        images: Vec<ImageHandle>,
    },
}

/// A loaded tileset covering `[first_gid, first_gid + tile_count)`
#[derive(Debug, Clone)]
pub struct Tileset {
    pub first_gid: u32,
    pub kind: TilesetKind,
}

impl Tileset {
    pub fn uniform(first_gid: u32, image: ImageHandle, columns: u32, tile_count: Option<u32>) -> Self {
        Self {
            first_gid,
            kind: TilesetKind::Uniform { image, columns: columns.max(1), tile_count },
        }
    }

    pub fn dynamic(first_gid: u32, images: Vec<ImageHandle>) -> Self {
        Self { first_gid, kind: TilesetKind::Dynamic { images } }
    }

    /// Load every image a definition refers to
    pub fn load(
        first_gid: u32,
        def: &TilesetDef,
        assets: &AssetRoot,
        images: &mut dyn ImageProvider,
    ) -> Result<Self, TilemapError> {
        match def.shape() {
            Some(TilesetShape::Dynamic) => {
                let tiles = def.tiles.as_deref().unwrap_or_default();
                let mut handles = Vec::with_capacity(tiles.len());
                for tile in tiles {
                    let declared = tile.image.as_deref().unwrap_or_default();
                    handles.push(load_tile_image(images, assets, first_gid, declared)?);
                }
                debug!(first_gid, tiles = handles.len(), "loaded dynamic tileset");
                Ok(Self::dynamic(first_gid, handles))
            }
            Some(TilesetShape::Uniform) => {
                let declared = def.image.as_deref().unwrap_or_default();
                let image = load_tile_image(images, assets, first_gid, declared)?;
                let columns = def.columns.filter(|&c| c > 0).unwrap_or(DEFAULT_ATLAS_COLUMNS);
                debug!(first_gid, columns, "loaded uniform tileset");
                Ok(Self::uniform(first_gid, image, columns, def.tilecount))
            }
            None => Err(TilemapError::InvalidTileset {
                first_gid,
                reason: "neither a sheet image nor a per-tile image list".to_owned(),
            }),
        }
    }

    /// Number of ids this tileset covers, if bounded
    pub fn tile_count(&self) -> Option<u32> {
        match &self.kind {
            TilesetKind::Uniform { tile_count, .. } => *tile_count,
            TilesetKind::Dynamic { images } => Some(images.len() as u32),
        }
    }

    /// Resolve a global id against this tileset alone
    pub fn resolve(&self, gid: u32) -> Result<TileImage, TilemapError> {
        let local = i64::from(gid) - i64::from(self.first_gid);
        match &self.kind {
            TilesetKind::Uniform { image, columns, tile_count } => {
                if local < 0 || tile_count.is_some_and(|count| local >= i64::from(count)) {
                    return Err(TilemapError::UnknownTileId(gid));
                }
                let local = local as u32;
                let x = (local % columns).checked_mul(TILE_SIZE_PX);
                let y = (local / columns).checked_mul(TILE_SIZE_PX);
                let (Some(x), Some(y)) = (x, y) else {
                    return Err(TilemapError::UnknownTileId(gid));
                };
                Ok(TileImage {
                    image: *image,
                    source: SourceRect::new(x, y, TILE_SIZE_PX, TILE_SIZE_PX),
                })
            }
            TilesetKind::Dynamic { images } => {
                let image = usize::try_from(local)
                    .ok()
                    .and_then(|i| images.get(i))
                    .ok_or(TilemapError::IndexOutOfRange { gid, local, len: images.len() })?;
                Ok(TileImage { image: *image, source: image.full_rect() })
            }
        }
    }
}

fn load_tile_image(
    images: &mut dyn ImageProvider,
    assets: &AssetRoot,
    first_gid: u32,
    declared: &str,
) -> Result<ImageHandle, TilemapError> {
    let path = assets.resolve(declared);
    images
        .load_image(&path)
        .map_err(|source| TilemapError::TilesetLoad { first_gid, source })
}

/// All tilesets of a map, sorted by first gid with non-overlapping ranges
#[derive(Debug, Clone, Default)]
pub struct Tilesets {
    sets: Vec<Tileset>,
}

impl Tilesets {
    pub fn new(mut sets: Vec<Tileset>) -> Result<Self, TilemapError> {
        sets.sort_by_key(|t| t.first_gid);

        if let Some(first) = sets.first() {
            if first.first_gid == 0 {
                return Err(TilemapError::Malformed("tileset first gid 0 is reserved for empty cells".to_owned()));
            }
        }
        for pair in sets.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.first_gid == b.first_gid {
                return Err(TilemapError::Malformed(format!(
                    "two tilesets share first gid {}", a.first_gid
                )));
            }
            if let Some(count) = a.tile_count() {
                if u64::from(a.first_gid) + u64::from(count) > u64::from(b.first_gid) {
                    return Err(TilemapError::Malformed(format!(
                        "tileset at gid {} ({} tiles) overlaps tileset at gid {}",
                        a.first_gid, count, b.first_gid
                    )));
                }
            }
        }
        Ok(Self { sets })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Resolve a global id to its image region.
    /// The owning tileset is the one with the greatest first gid not above `gid`.
    pub fn resolve(&self, gid: u32) -> Result<TileImage, TilemapError> {
        let idx = self.sets.partition_point(|t| t.first_gid <= gid);
        if idx == 0 {
            return Err(TilemapError::UnknownTileId(gid));
        }
        self.sets[idx - 1].resolve(gid)
    }
}
