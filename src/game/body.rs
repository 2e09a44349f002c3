//! Bodies and rectangles
//!
//! A [`Body`] is the movable part every entity owns: a position, the
//! velocity it is moving with this tick, and a tile-sized bounding box.

use serde::{Deserialize, Serialize};

use crate::constants::TILE_SIZE;

/// Axis-aligned rectangle defined by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from two corners, `min` top-left and `max` bottom-right
    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Interiors intersect. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Position, per-tick velocity and fixed bounding size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Body {
    /// Bounding box edge length
    pub const SIZE: f32 = TILE_SIZE;

    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, dx: 0.0, dy: 0.0 }
    }

    /// Current bounding box
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, Self::SIZE, Self::SIZE)
    }

    /// Center of the bounding box
    pub fn center(&self) -> (f32, f32) {
        (self.x + Self::SIZE * 0.5, self.y + Self::SIZE * 0.5)
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}
