//! World constants
//!
//! Tile size, logical viewport and movement speeds shared by the core.

/// Edge length of one map tile and of every entity bounding box, in world units
pub const TILE_SIZE: f32 = 16.0;

/// Tile size as an integer, for grid math and atlas slicing
pub const TILE_SIZE_PX: u32 = 16;

/// Logical viewport width
pub const VIEWPORT_WIDTH: f32 = 320.0;

/// Logical viewport height
pub const VIEWPORT_HEIGHT: f32 = 240.0;

/// Player movement per tick on each pressed axis
pub const PLAYER_SPEED: f32 = 2.0;

/// Follower steering per tick on each axis
pub const CHASE_SPEED: f32 = 0.5;

/// Column count of a uniform atlas that does not declare its own
pub const DEFAULT_ATLAS_COLUMNS: u32 = 22;
