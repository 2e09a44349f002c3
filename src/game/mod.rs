//! Game Simulation Module
//!
//! Entities, collision, camera and the per-tick orchestration that turns
//! them into draw commands.
//!
//! Key concepts:
//! - Body: position, per-tick velocity and a fixed 16x16 box, owned by exactly
//!   one entity (composition, no shared base type)
//! - Colliders: static rectangles, fixed for the lifetime of a world
//! - Game: owns everything and runs Simulate then Render once per tick
//!
//! Everything here is headless. Input arrives through [`crate::input::InputSource`]
//! and output leaves through [`Renderer`], so a world can be stepped in tests
//! without a window.

pub mod animation;
pub mod body;
pub mod camera;
pub mod collision;
pub mod components;
pub mod event;
pub mod renderer;
pub mod runtime;
pub mod simulation;

// Re-export main types
pub use animation::{Animation, SpriteSheet};
pub use body::{Body, Rect};
pub use camera::Camera;
pub use collision::{move_and_collide, resolve_axis, Axis};
pub use components::{Enemy, Facing, FacingAnimations, Player, Potion};
pub use event::{EventQueue, Events, PotionCollected};
pub use renderer::{DrawCommand, FrameRecorder, Letterbox, Renderer};
pub use runtime::{Game, LoadError, Sprites};
pub use simulation::{collect_potions, step_enemies, step_player, PickupRule};
