//! Endless Journey
//!
//! Window host for the tile world: keyboard in, textured quads out. The
//! world itself lives in the library and knows nothing about macroquad.
//!
//! `--headless <ticks>` runs the same world without a window.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use endless_journey::asset::{AssetError, DecodedImages, ImageHandle, ImageProvider};
use endless_journey::config::WorldConfig;
use endless_journey::game::{DrawCommand, FrameRecorder, Game, Letterbox, Renderer};
use endless_journey::input::{InputSource, InputState, ScriptedInput};
use endless_journey::VERSION;

#[derive(Parser, Debug)]
#[command(name = "endless-journey", version, about = "A small tile-based 2D world")]
struct Cli {
    /// World configuration (RON). Defaults are used if the file is missing.
    #[arg(long, default_value = "assets/world.ron")]
    config: PathBuf,

    /// Run this many ticks without a window, then exit
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_tracing();

    let cli = Cli::parse();
    let config = WorldConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load world config {}", cli.config.display()))?;

    if let Some(ticks) = cli.headless {
        return run_headless(&config, ticks);
    }

    macroquad::Window::from_config(window_conf(&config), async move {
        if let Err(e) = run_window(config).await {
            error!("{:#}", e);
            std::process::exit(1);
        }
    });
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn window_conf(config: &WorldConfig) -> Conf {
    Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width,
        window_height: config.window.height,
        window_resizable: config.window.resizable,
        ..Default::default()
    }
}

// =============================================================================
// Window mode
// =============================================================================

async fn run_window(config: WorldConfig) -> Result<()> {
    info!(version = VERSION, "starting");

    let mut images = TextureImages::default();
    let mut game = Game::load(&config, &mut images).context("failed to build world")?;
    let mut input = KeyboardInput;
    let [r, g, b, a] = config.background;
    let background = Color::from_rgba(r, g, b, a);

    loop {
        // F1 toggles the collider overlay
        if is_key_pressed(KeyCode::F1) {
            game.show_colliders = !game.show_colliders;
        }

        let mut renderer = ScreenRenderer {
            textures: &images.textures,
            viewport: game.viewport(),
            background,
        };
        game.tick(&mut input, &mut renderer);
        log_events(&game);

        next_frame().await;
    }
}

/// Arrow keys or WASD
struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> InputState {
        InputState {
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        }
    }
}

/// Decodes with the `image` crate, then uploads each new image as a
/// nearest-filtered texture indexed by its id
#[derive(Default)]
struct TextureImages {
    decoded: DecodedImages,
    textures: Vec<Texture2D>,
}

impl ImageProvider for TextureImages {
    fn load_image(&mut self, path: &Path) -> Result<ImageHandle, AssetError> {
        let handle = self.decoded.load_image(path)?;
        if handle.id.0 as usize == self.textures.len() {
            let (Ok(w), Ok(h)) = (u16::try_from(handle.width), u16::try_from(handle.height)) else {
                return Err(AssetError::decode(path, "image too large for a texture"));
            };
            let Some(pixels) = self.decoded.get(handle.id) else {
                return Err(AssetError::decode(path, "decoded image missing"));
            };
            let texture = Texture2D::from_rgba8(w, h, pixels.as_raw());
            texture.set_filter(FilterMode::Nearest);
            self.textures.push(texture);
        }
        Ok(handle)
    }
}

/// Draws a frame straight to the window, scaled up from the logical viewport
struct ScreenRenderer<'a> {
    textures: &'a [Texture2D],
    viewport: (f32, f32),
    background: Color,
}

impl Renderer for ScreenRenderer<'_> {
    fn draw(&mut self, commands: &[DrawCommand]) {
        let (sw, sh) = (screen_width(), screen_height());
        let view = Letterbox::fit(self.viewport, (sw, sh));

        clear_background(BLACK);
        draw_rectangle(view.offset_x, view.offset_y, view.width, view.height, self.background);

        for command in commands {
            match *command {
                DrawCommand::Image { image, source, x, y } => {
                    let Some(texture) = self.textures.get(image.id.0 as usize) else {
                        continue;
                    };
                    let (wx, wy) = view.to_window(x, y);
                    draw_texture_ex(
                        texture,
                        wx,
                        wy,
                        WHITE,
                        DrawTextureParams {
                            source: Some(Rect::new(
                                source.x as f32,
                                source.y as f32,
                                source.w as f32,
                                source.h as f32,
                            )),
                            dest_size: Some(vec2(source.w as f32 * view.scale, source.h as f32 * view.scale)),
                            ..Default::default()
                        },
                    );
                }
                DrawCommand::DebugRect { rect } => {
                    let (wx, wy) = view.to_window(rect.x, rect.y);
                    draw_rectangle_lines(
                        wx,
                        wy,
                        rect.w * view.scale,
                        rect.h * view.scale,
                        view.scale.max(1.0),
                        RED,
                    );
                }
            }
        }

        // Bars over anything drawn past the viewport edges
        let right = view.offset_x + view.width;
        let bottom = view.offset_y + view.height;
        draw_rectangle(0.0, 0.0, sw, view.offset_y, BLACK);
        draw_rectangle(0.0, bottom, sw, sh - bottom, BLACK);
        draw_rectangle(0.0, 0.0, view.offset_x, sh, BLACK);
        draw_rectangle(right, 0.0, sw - right, sh, BLACK);
    }
}

// =============================================================================
// Headless mode
// =============================================================================

fn run_headless(config: &WorldConfig, ticks: u64) -> Result<()> {
    let mut images = DecodedImages::new();
    let mut game = Game::load(config, &mut images).context("failed to build world")?;
    let mut input = ScriptedInput::idle();
    let mut recorder = FrameRecorder::new();

    for _ in 0..ticks {
        game.tick(&mut input, &mut recorder);
        log_events(&game);
    }

    // Every image region of the last frame must be croppable
    let bad = recorder
        .last_frame()
        .iter()
        .filter(|cmd| match cmd {
            DrawCommand::Image { image, source, .. } => images.crop(image.id, *source).is_none(),
            DrawCommand::DebugRect { .. } => false,
        })
        .count();
    if bad > 0 {
        warn!(count = bad, "draw commands reference regions outside their image");
    }

    let player = game.player();
    info!(
        ticks = game.ticks(),
        x = player.body.x,
        y = player.body.y,
        health = player.health,
        commands = recorder.last_frame().len(),
        "headless run finished"
    );
    for (i, enemy) in game.enemies().iter().enumerate() {
        info!(enemy = i, x = enemy.body.x, y = enemy.body.y, "enemy");
    }
    Ok(())
}

fn log_events(game: &Game) {
    for event in game.events().potion_collected.iter() {
        info!(potion = event.potion, heal = event.heal, health = event.health, "Picked up potion!");
    }
}
