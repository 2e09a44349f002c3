//! Tilemap
//!
//! An ordered stack of equally sized tile layers plus the tilesets that
//! cover their ids. The on-disk format is the JSON map export of the Tiled
//! editor, reduced to what the world needs:
//!
//! ```json
//! {
//!   "layers": [{ "width": 2, "height": 1, "data": [1, 0] }],
//!   "tilesets": [{ "firstgid": 1, "source": "floor.json" }]
//! }
//! ```
//!
//! A tileset reference either points at a standalone tileset document
//! (`source`) or carries the tileset body inline.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, error};

use crate::asset::{read_bytes, sanitize_relative, AssetError, AssetRoot, ImageProvider};
use crate::constants::TILE_SIZE;
use crate::game::Camera;
use super::{TileImage, Tileset, TilesetDef, Tilesets, TilemapError};

// =============================================================================
// Definition format
// =============================================================================

/// Tilemap document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TilemapDef {
    #[serde(default)]
    pub layers: Vec<LayerDef>,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
}

/// One layer entry. Only tile layers carry data; object and image layers
/// exported alongside them are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerDef {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub data: Vec<u32>,
}

impl LayerDef {
    fn is_tile_layer(&self) -> bool {
        self.kind.as_deref().map_or(true, |k| k == "tilelayer")
    }
}

/// Tileset entry of a tilemap document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TilesetRef {
    pub firstgid: u32,
    /// Standalone tileset document, relative to the tilemap's directory
    #[serde(default)]
    pub source: Option<String>,
    /// Inline tileset body, used when `source` is absent
    #[serde(flatten)]
    pub inline: TilesetDef,
}

impl TilemapDef {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// =============================================================================
// Loaded tilemap
// =============================================================================

/// A grid of tile ids; 0 means empty
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl Layer {
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Self {
        Self { name: String::new(), width, height, data }
    }

    /// Tile id at grid position, or None outside the layer
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }
}

/// One tile to paint, in paint order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDraw {
    /// Top-left of the drawn image in world space (bottom-anchored to its cell)
    pub world_x: f32,
    pub world_y: f32,
    /// Same point after the camera offset
    pub screen_x: f32,
    pub screen_y: f32,
    pub gid: u32,
    pub tile: TileImage,
}

#[derive(Debug, Clone)]
pub struct Tilemap {
    layers: Vec<Layer>,
    tilesets: Tilesets,
}

impl Tilemap {
    /// Read, parse and load a tilemap document from disk.
    ///
    /// Standalone tileset documents are looked up under the tilemap's own
    /// directory; images are looked up under `assets`.
    pub fn open(
        path: &Path,
        assets: &AssetRoot,
        images: &mut dyn ImageProvider,
    ) -> Result<Self, TilemapError> {
        let bytes = read_bytes(path)?;
        let text = std::str::from_utf8(&bytes).map_err(|e| AssetError::decode(path, e))?;
        let def = TilemapDef::from_json(text).map_err(|e| AssetError::decode(path, e))?;
        let map_dir = path.parent().unwrap_or_else(|| Path::new("."));
        debug!(path = %path.display(), layers = def.layers.len(), tilesets = def.tilesets.len(), "parsed tilemap");
        Self::load(&def, map_dir, assets, images)
    }

    /// Build a tilemap from a parsed definition
    pub fn load(
        def: &TilemapDef,
        map_dir: &Path,
        assets: &AssetRoot,
        images: &mut dyn ImageProvider,
    ) -> Result<Self, TilemapError> {
        let layers: Vec<Layer> = def
            .layers
            .iter()
            .filter(|l| {
                let keep = l.is_tile_layer();
                if !keep {
                    debug!(layer = %l.name, "skipping non-tile layer");
                }
                keep
            })
            .map(|l| Layer {
                name: l.name.clone(),
                width: l.width,
                height: l.height,
                data: l.data.clone(),
            })
            .collect();

        // Check shapes before touching any image
        validate_layers(&layers)?;

        let mut sets = Vec::with_capacity(def.tilesets.len());
        for entry in &def.tilesets {
            let body = match &entry.source {
                Some(source) => {
                    read_tileset_doc(entry.firstgid, &map_dir.join(sanitize_relative(source)))?
                }
                None => entry.inline.clone(),
            };
            sets.push(Tileset::load(entry.firstgid, &body, assets, images)?);
        }

        Self::from_parts(layers, Tilesets::new(sets)?)
    }

    /// Assemble and validate: equal layer shapes, matching data lengths, and
    /// every referenced id resolvable.
    pub fn from_parts(layers: Vec<Layer>, tilesets: Tilesets) -> Result<Self, TilemapError> {
        validate_layers(&layers)?;
        for layer in &layers {
            for &gid in layer.data.iter().filter(|&&gid| gid != 0) {
                tilesets.resolve(gid)?;
            }
        }
        Ok(Self { layers, tilesets })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tilesets(&self) -> &Tilesets {
        &self.tilesets
    }

    /// Width in tiles (all layers share it)
    pub fn width(&self) -> usize {
        self.layers[0].width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.layers[0].height
    }

    /// World size in world units
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.width() as f32 * TILE_SIZE, self.height() as f32 * TILE_SIZE)
    }

    /// Every non-empty cell in paint order: layers in declaration order, and
    /// row-major within a layer. Images taller than a tile hang upwards from
    /// the bottom of their cell.
    pub fn tile_draw_list(&self, camera: &Camera) -> Vec<TileDraw> {
        let mut draws = Vec::new();
        for layer in &self.layers {
            for (index, &gid) in layer.data.iter().enumerate() {
                if gid == 0 {
                    continue;
                }
                let tile = match self.tilesets.resolve(gid) {
                    Ok(tile) => tile,
                    Err(e) => {
                        // Ids are all checked at load
                        error!(gid, error = %e, "tile failed to resolve while drawing");
                        continue;
                    }
                };
                let x = (index % layer.width) as f32 * TILE_SIZE;
                let y = (index / layer.width) as f32 * TILE_SIZE;
                let world_y = y + TILE_SIZE - tile.source.h as f32;
                draws.push(TileDraw {
                    world_x: x,
                    world_y,
                    screen_x: x + camera.x,
                    screen_y: world_y + camera.y,
                    gid,
                    tile,
                });
            }
        }
        draws
    }
}

fn validate_layers(layers: &[Layer]) -> Result<(), TilemapError> {
    let Some(first) = layers.first() else {
        return Err(TilemapError::Malformed("tilemap has no tile layers".to_owned()));
    };
    if first.width == 0 || first.height == 0 {
        return Err(TilemapError::Malformed(format!(
            "layer 0 has empty size {}x{}", first.width, first.height
        )));
    }
    for (i, layer) in layers.iter().enumerate() {
        if layer.width != first.width || layer.height != first.height {
            return Err(TilemapError::Malformed(format!(
                "layer {} is {}x{} but layer 0 is {}x{}",
                i, layer.width, layer.height, first.width, first.height
            )));
        }
        let Some(cells) = layer.width.checked_mul(layer.height) else {
            return Err(TilemapError::Malformed(format!(
                "layer {} size {}x{} is too large",
                i, layer.width, layer.height
            )));
        };
        if layer.data.len() != cells {
            return Err(TilemapError::Malformed(format!(
                "layer {} holds {} tiles, expected {}x{} = {}",
                i,
                layer.data.len(),
                layer.width,
                layer.height,
                cells
            )));
        }
    }
    Ok(())
}

fn read_tileset_doc(first_gid: u32, path: &Path) -> Result<TilesetDef, TilemapError> {
    let wrap = |source| TilemapError::TilesetLoad { first_gid, source };
    let bytes = read_bytes(path).map_err(wrap)?;
    serde_json::from_slice(&bytes).map_err(|e| wrap(AssetError::decode(path, e)))
}
