//! World configuration
//!
//! Everything that describes a playable world besides the tilemap itself:
//! window and viewport, where assets live, entity spawns, speeds and static
//! colliders. Stored as RON. Every field has a default, so a partial file
//! overrides only what it names and a missing file gives the stock world.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::asset::AssetRoot;
use crate::constants::{CHASE_SPEED, PLAYER_SPEED, TILE_SIZE_PX, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::game::components::FacingAnimations;
use crate::game::{PickupRule, Rect, SpriteSheet};

/// Sanity limits applied after parsing
pub mod limits {
    /// Largest coordinate accepted anywhere in the config
    pub const MAX_COORD: f32 = 1_000_000.0;
    /// Largest logical viewport edge
    pub const MAX_VIEWPORT: f32 = 8192.0;
    /// Largest per-tick speed
    pub const MAX_SPEED: f32 = 1024.0;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Host window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Endless Journey".to_owned(),
            width: 640,
            height: 480,
            resizable: true,
        }
    }
}

/// Fixed logical resolution the world is drawn at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub x: f32,
    pub y: f32,
    pub health: i32,
    /// Movement per tick on each pressed axis
    pub speed: f32,
    /// Sprite sheet image, relative to the asset directory
    pub image: String,
    pub sheet: SpriteSheet,
    pub animations: FacingAnimations,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            health: 3,
            speed: PLAYER_SPEED,
            image: "images/ninja.png".to_owned(),
            sheet: SpriteSheet::new(4, 7, TILE_SIZE_PX),
            animations: FacingAnimations::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_follows")]
    pub follows_player: bool,
}

fn default_follows() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub image: String,
    /// Chase speed per tick on each axis
    pub speed: f32,
    pub spawns: Vec<EnemySpawn>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        let spawn = |x, y| EnemySpawn { x, y, follows_player: true };
        Self {
            image: "images/skeleton.png".to_owned(),
            speed: CHASE_SPEED,
            spawns: vec![spawn(100.0, 100.0), spawn(150.0, 150.0), spawn(200.0, 200.0)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotionSpawn {
    pub x: f32,
    pub y: f32,
    pub heal: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotionConfig {
    pub image: String,
    pub rule: PickupRule,
    pub spawns: Vec<PotionSpawn>,
}

impl Default for PotionConfig {
    fn default() -> Self {
        Self {
            image: "images/potion.png".to_owned(),
            rule: PickupRule::default(),
            spawns: vec![PotionSpawn { x: 210.0, y: 100.0, heal: 1 }],
        }
    }
}

// =============================================================================
// WorldConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub window: WindowConfig,
    pub viewport: ViewportConfig,
    /// Root every asset path is resolved under
    pub asset_dir: PathBuf,
    /// Tilemap document, relative to `asset_dir`
    pub tilemap: String,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub potions: PotionConfig,
    /// Static collision rectangles in world space
    pub colliders: Vec<Rect>,
    /// Outline colliders on screen
    pub show_colliders: bool,
    /// Clear color, RGBA
    pub background: [u8; 4],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            viewport: ViewportConfig::default(),
            asset_dir: PathBuf::from("assets"),
            tilemap: "maps/spawn.json".to_owned(),
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            potions: PotionConfig::default(),
            colliders: vec![Rect::from_min_max(100.0, 100.0, 116.0, 116.0)],
            show_colliders: true,
            background: [120, 180, 255, 255],
        }
    }
}

impl WorldConfig {
    /// Parse and validate a RON document
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        debug!(path = %path.display(), "loaded world config");
        Ok(config)
    }

    /// Load from a RON file, or fall back to the stock world when the file
    /// does not exist. Any other failure is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "no world config found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_ron()?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Where asset paths are resolved
    pub fn asset_root(&self) -> AssetRoot {
        AssetRoot::new(&self.asset_dir)
    }

    /// Full path of the tilemap document
    pub fn tilemap_path(&self) -> PathBuf {
        self.asset_root().resolve(&self.tilemap)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(ConfigError::Validation)
    }
}

// =============================================================================
// Validation
// =============================================================================

fn is_valid_coord(v: f32) -> bool {
    v.is_finite() && v.abs() <= limits::MAX_COORD
}

fn check_point(x: f32, y: f32, context: &str) -> Result<(), String> {
    if !is_valid_coord(x) || !is_valid_coord(y) {
        return Err(format!("{}: invalid position ({}, {})", context, x, y));
    }
    Ok(())
}

fn check_speed(speed: f32, context: &str) -> Result<(), String> {
    if !speed.is_finite() || speed < 0.0 || speed > limits::MAX_SPEED {
        return Err(format!("{}: invalid speed {}", context, speed));
    }
    Ok(())
}

fn validate_config(config: &WorldConfig) -> Result<(), String> {
    let vp = config.viewport;
    for (edge, v) in [("width", vp.width), ("height", vp.height)] {
        if !v.is_finite() || v <= 0.0 || v > limits::MAX_VIEWPORT {
            return Err(format!("viewport {} must be in (0, {}], got {}", edge, limits::MAX_VIEWPORT, v));
        }
    }
    if config.window.width <= 0 || config.window.height <= 0 {
        return Err(format!(
            "window size must be positive, got {}x{}",
            config.window.width, config.window.height
        ));
    }

    let player = &config.player;
    check_point(player.x, player.y, "player")?;
    check_speed(player.speed, "player")?;
    let sheet = player.sheet;
    if sheet.columns == 0 || sheet.rows == 0 || sheet.tile == 0 {
        return Err(format!(
            "player sheet must be non-empty, got {}x{} frames of {}px",
            sheet.columns, sheet.rows, sheet.tile
        ));
    }
    let anims = &player.animations;
    for (name, anim) in [("up", anims.up), ("down", anims.down), ("left", anims.left), ("right", anims.right)] {
        if anim.first > anim.last || anim.last >= sheet.frame_count() {
            return Err(format!(
                "player animation {}: frames {}..={} outside a {}-frame sheet",
                name,
                anim.first,
                anim.last,
                sheet.frame_count()
            ));
        }
    }

    check_speed(config.enemies.speed, "enemies")?;
    for (i, spawn) in config.enemies.spawns.iter().enumerate() {
        check_point(spawn.x, spawn.y, &format!("enemy[{}]", i))?;
    }

    for (i, spawn) in config.potions.spawns.iter().enumerate() {
        let context = format!("potion[{}]", i);
        check_point(spawn.x, spawn.y, &context)?;
        if spawn.heal < 0 {
            return Err(format!("{}: heal must not be negative, got {}", context, spawn.heal));
        }
    }

    for (i, c) in config.colliders.iter().enumerate() {
        let context = format!("collider[{}]", i);
        check_point(c.x, c.y, &context)?;
        if !(c.w.is_finite() && c.h.is_finite()) || c.w <= 0.0 || c.h <= 0.0 {
            return Err(format!("{}: size must be positive, got {}x{}", context, c.w, c.h));
        }
    }

    if config.tilemap.trim().is_empty() {
        return Err("tilemap path is empty".to_owned());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_the_stock_world() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.player.x, config.player.y, config.player.health), (50.0, 50.0, 3));
        assert_eq!(config.enemies.spawns.len(), 3);
        assert_eq!(config.potions.spawns[0], PotionSpawn { x: 210.0, y: 100.0, heal: 1 });
        assert_eq!(config.colliders, vec![Rect::new(100.0, 100.0, 16.0, 16.0)]);
        assert_eq!(config.tilemap_path(), Path::new("assets/maps/spawn.json"));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = WorldConfig::from_ron(include_str!("../assets/world.ron")).unwrap();
        assert_eq!(shipped, WorldConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = WorldConfig::from_ron(
            "(player: (x: 10.0, speed: 3.0), potions: (rule: CrossedX), show_colliders: false)",
        )
        .unwrap();
        assert_eq!(config.player.x, 10.0);
        assert_eq!(config.player.y, 50.0);
        assert_eq!(config.player.speed, 3.0);
        assert_eq!(config.player.image, "images/ninja.png");
        assert_eq!(config.potions.rule, PickupRule::CrossedX);
        assert_eq!(config.potions.spawns.len(), 1);
        assert!(!config.show_colliders);
        assert_eq!(config.enemies, EnemyConfig::default());
    }

    #[test]
    fn test_enemy_follows_by_default() {
        let config = WorldConfig::from_ron("(enemies: (spawns: [(x: 1.0, y: 2.0)]))").unwrap();
        assert!(config.enemies.spawns[0].follows_player);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            "(viewport: (width: 0.0))",
            "(potions: (spawns: [(x: 0.0, y: 0.0, heal: -1)]))",
            "(colliders: [(x: 0.0, y: 0.0, w: -16.0, h: 16.0)])",
            "(player: (sheet: (columns: 0, rows: 7, tile: 16)))",
            "(player: (x: 2000000.0))",
            "(enemies: (speed: -0.5))",
            "(tilemap: \"\")",
        ];
        for case in cases {
            match WorldConfig::from_ron(case) {
                Err(ConfigError::Validation(_)) => {}
                other => panic!("{} should fail validation, got {:?}", case, other),
            }
        }
    }

    #[test]
    fn test_animation_must_fit_sheet() {
        let err = WorldConfig::from_ron(
            "(player: (sheet: (columns: 4, rows: 2, tile: 16)))",
        )
        .unwrap_err();
        assert!(err.to_string().contains("animation"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(WorldConfig::from_ron("(player: "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.ron");

        let mut config = WorldConfig::default();
        config.player.health = 7;
        config.colliders.push(Rect::new(0.0, 0.0, 32.0, 16.0));
        config.save(&path).unwrap();

        assert_eq!(WorldConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.ron");
        assert_eq!(WorldConfig::load_or_default(&missing).unwrap(), WorldConfig::default());

        let broken = dir.path().join("broken.ron");
        fs::write(&broken, "not ron at all (").unwrap();
        assert!(WorldConfig::load_or_default(&broken).is_err());

        assert!(matches!(WorldConfig::load(&missing), Err(ConfigError::Io { .. })));
    }
}
