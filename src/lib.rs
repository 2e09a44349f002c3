//! Endless Journey: a small tile-based 2D world
//!
//! Layered tilemaps, a follow camera, axis-separated collision and a few
//! entities, stepped one tick at a time. The library is headless; the
//! binary adds a window, keyboard input and textures.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod asset;
pub mod config;
pub mod constants;
pub mod game;
pub mod input;
pub mod world;
