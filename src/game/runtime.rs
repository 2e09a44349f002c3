//! Game Runtime
//!
//! Owns a loaded world and advances it one tick at a time. A tick is always
//! Simulate then Render: entities move, the camera follows the player and
//! is clamped, and only then is the frame built, so every draw command sees
//! this tick's final state.

use thiserror::Error;
use tracing::{debug, info};

use crate::asset::{AssetError, ImageHandle, ImageProvider, SourceRect};
use crate::config::{ConfigError, WorldConfig};
use crate::constants::TILE_SIZE_PX;
use crate::input::{InputSource, InputState};
use crate::world::{Tilemap, TilemapError};

use super::animation::SpriteSheet;
use super::body::Rect;
use super::camera::Camera;
use super::components::{Enemy, Player, Potion};
use super::event::Events;
use super::renderer::{DrawCommand, Renderer};
use super::simulation::{collect_potions, step_enemies, step_player, PickupRule};

/// Anything that stops a world from being built. There is no partial world.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tilemap(#[from] TilemapError),
    #[error("failed to load {what} sprite: {source}")]
    Sprite {
        what: &'static str,
        #[source]
        source: AssetError,
    },
}

/// Images used for entities
#[derive(Debug, Clone, Copy)]
pub struct Sprites {
    pub player: ImageHandle,
    pub enemy: ImageHandle,
    pub potion: ImageHandle,
}

impl Sprites {
    /// Load the three entity images named in the config
    pub fn load(config: &WorldConfig, images: &mut dyn ImageProvider) -> Result<Self, LoadError> {
        let assets = config.asset_root();
        let mut load = |what: &'static str, declared: &str| {
            images
                .load_image(&assets.resolve(declared))
                .map_err(|source| LoadError::Sprite { what, source })
        };
        Ok(Self {
            player: load("player", &config.player.image)?,
            enemy: load("enemy", &config.enemies.image)?,
            potion: load("potion", &config.potions.image)?,
        })
    }
}

/// A running world
pub struct Game {
    tilemap: Tilemap,
    player: Player,
    enemies: Vec<Enemy>,
    potions: Vec<Potion>,
    colliders: Vec<Rect>,
    camera: Camera,
    viewport: (f32, f32),
    player_speed: f32,
    chase_speed: f32,
    pickup_rule: PickupRule,
    pub show_colliders: bool,
    sprites: Sprites,
    player_sheet: SpriteSheet,
    events: Events,
    ticks: u64,
}

impl Game {
    /// Load the tilemap and sprites named by `config` and spawn its entities
    pub fn load(config: &WorldConfig, images: &mut dyn ImageProvider) -> Result<Self, LoadError> {
        config.validate()?;
        let tilemap_path = config.tilemap_path();
        debug!(path = %tilemap_path.display(), "loading tilemap");
        let tilemap = Tilemap::open(&tilemap_path, &config.asset_root(), images)?;
        let sprites = Sprites::load(config, images)?;
        Ok(Self::new(config, tilemap, sprites))
    }

    /// Spawn the configured entities into an already loaded tilemap
    pub fn new(config: &WorldConfig, tilemap: Tilemap, sprites: Sprites) -> Self {
        let player = Player::new(
            config.player.x,
            config.player.y,
            config.player.health,
            config.player.animations,
        );
        let enemies: Vec<Enemy> = config
            .enemies
            .spawns
            .iter()
            .map(|s| Enemy::new(s.x, s.y, s.follows_player))
            .collect();
        let potions: Vec<Potion> = config
            .potions
            .spawns
            .iter()
            .map(|s| Potion::new(s.x, s.y, s.heal))
            .collect();

        info!(
            width = tilemap.width(),
            height = tilemap.height(),
            layers = tilemap.layers().len(),
            enemies = enemies.len(),
            potions = potions.len(),
            colliders = config.colliders.len(),
            "world ready"
        );

        Self {
            tilemap,
            player,
            enemies,
            potions,
            colliders: config.colliders.clone(),
            camera: Camera::default(),
            viewport: (config.viewport.width, config.viewport.height),
            player_speed: config.player.speed,
            chase_speed: config.enemies.speed,
            pickup_rule: config.potions.rule,
            show_colliders: config.show_colliders,
            sprites,
            player_sheet: config.player.sheet,
            events: Events::new(),
            ticks: 0,
        }
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Poll input once, simulate, then hand the frame to `renderer`
    pub fn tick(&mut self, input: &mut dyn InputSource, renderer: &mut dyn Renderer) {
        let state = input.poll();
        self.simulate(state);
        let frame = self.render();
        renderer.draw(&frame);
    }

    /// Simulate phase: entities, then camera follow and clamp
    pub fn simulate(&mut self, input: InputState) {
        self.events.clear_all();

        step_player(&mut self.player, input, self.player_speed, &self.colliders);
        step_enemies(&mut self.enemies, &self.player.body, self.chase_speed, &self.colliders);
        collect_potions(
            &mut self.player,
            &mut self.potions,
            self.pickup_rule,
            &mut self.events.potion_collected,
        );

        let (vw, vh) = self.viewport;
        let (cx, cy) = self.player.body.center();
        self.camera.follow_target(cx, cy, vw, vh);
        let (ww, wh) = self.tilemap.pixel_size();
        self.camera.constrain(ww, wh, vw, vh);

        self.ticks += 1;
    }

    /// Render phase: tiles, player, enemies, potions, then the collider
    /// overlay, all in screen space
    pub fn render(&self) -> Vec<DrawCommand> {
        let tiles = self.tilemap.tile_draw_list(&self.camera);
        let mut frame = Vec::with_capacity(
            tiles.len() + 1 + self.enemies.len() + self.potions.len() + self.colliders.len(),
        );

        frame.extend(tiles.iter().map(|t| DrawCommand::Image {
            image: t.tile.image,
            source: t.tile.source,
            x: t.screen_x,
            y: t.screen_y,
        }));

        let player_source = self.player_sheet.rect(self.player.frame());
        frame.push(self.sprite(self.sprites.player, player_source, self.player.body.x, self.player.body.y));

        let enemy_source = first_cell(self.sprites.enemy);
        for enemy in &self.enemies {
            frame.push(self.sprite(self.sprites.enemy, enemy_source, enemy.body.x, enemy.body.y));
        }

        let potion_source = first_cell(self.sprites.potion);
        for potion in self.potions.iter().filter(|p| !p.collected) {
            frame.push(self.sprite(self.sprites.potion, potion_source, potion.body.x, potion.body.y));
        }

        if self.show_colliders {
            for c in &self.colliders {
                let (x, y) = self.camera.to_screen(c.x, c.y);
                frame.push(DrawCommand::DebugRect { rect: Rect::new(x, y, c.w, c.h) });
            }
        }

        frame
    }

    fn sprite(&self, image: ImageHandle, source: SourceRect, x: f32, y: f32) -> DrawCommand {
        let (x, y) = self.camera.to_screen(x, y);
        DrawCommand::Image { image, source, x, y }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn potions(&self) -> &[Potion] {
        &self.potions
    }

    pub fn colliders(&self) -> &[Rect] {
        &self.colliders
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    /// Logical resolution the frame is drawn at
    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Events raised by the last Simulate phase
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Events {
        &mut self.events
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Top-left tile of a single-frame sprite image
fn first_cell(image: ImageHandle) -> SourceRect {
    SourceRect::new(0, 0, image.width.min(TILE_SIZE_PX), image.height.min(TILE_SIZE_PX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{DecodedImages, ImageId};
    use crate::config::{EnemySpawn, PotionSpawn};
    use crate::game::FrameRecorder;
    use crate::input::ScriptedInput;
    use crate::world::{Layer, Tileset, Tilesets};
    use image::RgbaImage;
    use std::path::Path;
    use tempfile::TempDir;

    const MAP_W: usize = 40;
    const MAP_H: usize = 30;
    const CELLS: usize = MAP_W * MAP_H;

    fn sprites() -> Sprites {
        Sprites {
            player: ImageHandle::new(ImageId(1), 64, 112),
            enemy: ImageHandle::new(ImageId(2), 64, 64),
            potion: ImageHandle::new(ImageId(3), 16, 16),
        }
    }

    /// 640x480 world, every cell filled
    fn tilemap() -> Tilemap {
        let sheet = Tileset::uniform(1, ImageHandle::new(ImageId(0), 352, 256), 22, None);
        Tilemap::from_parts(
            vec![Layer::new(MAP_W, MAP_H, vec![1; CELLS])],
            Tilesets::new(vec![sheet]).unwrap(),
        )
        .unwrap()
    }

    fn game(config: &WorldConfig) -> Game {
        Game::new(config, tilemap(), sprites())
    }

    fn images_of(frame: &[DrawCommand], id: u32) -> Vec<(f32, f32)> {
        frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Image { image, x, y, .. } if image.id == ImageId(id) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_player_walks_right_five_ticks() {
        let mut game = game(&WorldConfig::default());
        let mut input = ScriptedInput::hold(InputState::RIGHT, 5);
        let mut recorder = FrameRecorder::new();
        for _ in 0..5 {
            game.tick(&mut input, &mut recorder);
        }
        let body = game.player().body;
        assert_eq!((body.x, body.y), (60.0, 50.0));
        assert_eq!(game.ticks(), 5);
        assert_eq!(recorder.frames_seen(), 5);
    }

    #[test]
    fn test_enemy_steps_toward_still_player() {
        let mut config = WorldConfig::default();
        config.colliders.clear();
        let mut game = game(&config);
        game.simulate(InputState::IDLE);
        let enemy = game.enemies()[0].body;
        assert_eq!((enemy.x, enemy.y), (99.5, 99.5));
    }

    #[test]
    fn test_enemy_spawned_on_collider_is_pushed_out() {
        // Stock world: enemy 0 starts on top of the stock collider
        let mut game = game(&WorldConfig::default());
        game.simulate(InputState::IDLE);
        let enemy = game.enemies()[0].body;
        assert_eq!((enemy.x, enemy.y), (116.0, 99.5));
    }

    #[test]
    fn test_player_stalls_at_collider() {
        let mut config = WorldConfig::default();
        config.player.x = 90.0;
        config.player.y = 100.0;
        config.enemies.spawns.clear();
        let mut game = game(&config);

        game.simulate(InputState::RIGHT);
        assert_eq!(game.player().body.x, 84.0);
        game.simulate(InputState::RIGHT);
        assert_eq!(game.player().body.x, 84.0);
    }

    #[test]
    fn test_frame_order() {
        let mut game = game(&WorldConfig::default());
        let mut recorder = FrameRecorder::new();
        game.tick(&mut ScriptedInput::idle(), &mut recorder);

        let frame = recorder.last_frame();
        assert_eq!(frame.len(), CELLS + 1 + 3 + 1 + 1);
        assert!(frame[..CELLS].iter().all(|c| matches!(c, DrawCommand::Image { image, .. } if image.id == ImageId(0))));
        assert!(matches!(frame[CELLS], DrawCommand::Image { image, .. } if image.id == ImageId(1)));
        assert!(frame[CELLS + 1..CELLS + 4]
            .iter()
            .all(|c| matches!(c, DrawCommand::Image { image, .. } if image.id == ImageId(2))));
        assert!(matches!(frame[CELLS + 4], DrawCommand::Image { image, .. } if image.id == ImageId(3)));
        assert!(matches!(frame[CELLS + 5], DrawCommand::DebugRect { .. }));
    }

    #[test]
    fn test_overlay_can_be_disabled() {
        let mut config = WorldConfig::default();
        config.show_colliders = false;
        let mut game = game(&config);
        game.simulate(InputState::IDLE);
        assert!(!game.render().iter().any(|c| matches!(c, DrawCommand::DebugRect { .. })));
    }

    #[test]
    fn test_camera_follows_and_clamps() {
        let mut config = WorldConfig::default();
        config.player.x = 400.0;
        config.player.y = 300.0;
        config.enemies.spawns.clear();
        let mut game = game(&config);

        game.simulate(InputState::IDLE);
        assert_eq!(game.camera(), Camera::new(-248.0, -188.0));

        // Render observes the post-simulation camera
        let frame = game.render();
        assert_eq!(images_of(&frame, 1), vec![(152.0, 112.0)]);
        assert_eq!(frame[0].position(), (-248.0, -188.0));
        let overlay = frame.last().unwrap();
        assert_eq!(overlay.position(), (100.0 - 248.0, 100.0 - 188.0));
    }

    #[test]
    fn test_camera_clamped_near_origin() {
        let mut game = game(&WorldConfig::default());
        game.simulate(InputState::IDLE);
        assert_eq!(game.camera(), Camera::new(0.0, 0.0));
    }

    #[test]
    fn test_potion_collected_once_and_hidden() {
        let mut config = WorldConfig::default();
        config.potions.spawns = vec![PotionSpawn { x: 60.0, y: 50.0, heal: 2 }];
        config.enemies.spawns.clear();
        let mut game = game(&config);
        let mut recorder = FrameRecorder::new();

        game.tick(&mut ScriptedInput::idle(), &mut recorder);
        assert_eq!(game.player().health, 5);
        assert_eq!(game.events().potion_collected.iter().count(), 1);
        assert!(images_of(recorder.last_frame(), 3).is_empty());

        let mut input = ScriptedInput::hold(InputState::RIGHT, 10);
        for _ in 0..10 {
            game.tick(&mut input, &mut recorder);
            assert!(game.events().potion_collected.is_empty());
        }
        assert_eq!(game.player().health, 5);
    }

    #[test]
    fn test_crossed_x_rule() {
        let mut config = WorldConfig::default();
        config.potions.rule = PickupRule::CrossedX;
        config.potions.spawns = vec![PotionSpawn { x: 55.0, y: 400.0, heal: 1 }];
        config.enemies.spawns = vec![EnemySpawn { x: 0.0, y: 0.0, follows_player: false }];
        let mut game = game(&config);

        for _ in 0..2 {
            game.simulate(InputState::RIGHT);
        }
        assert_eq!(game.player().health, 3);
        for _ in 0..5 {
            game.simulate(InputState::RIGHT);
        }
        assert_eq!(game.player().health, 4);
        assert!(game.potions()[0].collected);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("assets");
        let png = |rel: &str, w, h| {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            RgbaImage::new(w, h).save(&path).unwrap();
        };
        png("images/TilesetFloor.png", 352, 256);
        png("images/ninja.png", 64, 112);
        png("images/skeleton.png", 64, 64);
        png("images/potion.png", 16, 16);
        std::fs::create_dir_all(root.join("maps")).unwrap();
        std::fs::write(
            root.join("maps/spawn.json"),
            r#"{
                "layers": [{"name": "ground", "type": "tilelayer", "width": 30, "height": 20, "data": [SEQ]}],
                "tilesets": [{"firstgid": 1, "image": "../images/TilesetFloor.png", "columns": 22}]
            }"#
            .replace("SEQ", &vec!["1"; 600].join(",")),
        )
        .unwrap();

        let mut config = WorldConfig::default();
        config.asset_dir = root.clone();
        let mut images = DecodedImages::new();
        let game = Game::load(&config, &mut images).unwrap();

        assert_eq!(game.tilemap().pixel_size(), (480.0, 320.0));
        assert_eq!(images.len(), 4);

        // Missing sprite aborts the whole load
        std::fs::remove_file(root.join("images/potion.png")).unwrap();
        let mut images = DecodedImages::new();
        match Game::load(&config, &mut images) {
            Err(LoadError::Sprite { what: "potion", source: AssetError::NotFound { path } }) => {
                assert_eq!(path, root.join(Path::new("images/potion.png")));
            }
            other => panic!("expected missing potion sprite, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_loading() {
        let mut config = WorldConfig::default();
        config.viewport.width = -1.0;
        let mut images = DecodedImages::new();
        assert!(matches!(Game::load(&config, &mut images), Err(LoadError::Config(_))));
        assert!(images.is_empty());
    }
}
