//! Game Components
//!
//! The three kinds of entity in a world. Each one owns a [`Body`] and adds
//! its own fields; movement and collision code takes the body by `&mut`
//! and never needs to know which entity it belongs to.

use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::body::Body;

// =============================================================================
// Facing
// =============================================================================

/// Direction the player last moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing implied by a velocity, horizontal first. `None` when still.
    pub fn from_velocity(dx: f32, dy: f32) -> Option<Facing> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else if dy > 0.0 {
            Some(Facing::Down)
        } else if dy < 0.0 {
            Some(Facing::Up)
        } else {
            None
        }
    }
}

/// One walk cycle per facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacingAnimations {
    pub up: Animation,
    pub down: Animation,
    pub left: Animation,
    pub right: Animation,
}

impl FacingAnimations {
    pub fn get(&self, facing: Facing) -> &Animation {
        match facing {
            Facing::Up => &self.up,
            Facing::Down => &self.down,
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, facing: Facing) -> &mut Animation {
        match facing {
            Facing::Up => &mut self.up,
            Facing::Down => &mut self.down,
            Facing::Left => &mut self.left,
            Facing::Right => &mut self.right,
        }
    }
}

impl Default for FacingAnimations {
    fn default() -> Self {
        Self {
            up: Animation::new(5, 13, 4, 20),
            down: Animation::new(4, 12, 4, 20),
            left: Animation::new(6, 14, 4, 20),
            right: Animation::new(7, 15, 4, 20),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// The controllable character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub facing: Facing,
    pub animations: FacingAnimations,
}

impl Player {
    pub fn new(x: f32, y: f32, health: i32, animations: FacingAnimations) -> Self {
        Self {
            body: Body::at(x, y),
            health,
            facing: Facing::default(),
            animations,
        }
    }

    /// Sprite sheet frame to draw this tick.
    /// Idle players hold the first frame of their facing's cycle.
    pub fn frame(&self) -> u32 {
        let anim = self.animations.get(self.facing);
        if self.body.is_moving() {
            anim.frame()
        } else {
            anim.first
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.health += amount;
    }
}

/// A non-player character, optionally chasing the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub follows_player: bool,
}

impl Enemy {
    pub fn new(x: f32, y: f32, follows_player: bool) -> Self {
        Self {
            body: Body::at(x, y),
            follows_player,
        }
    }
}

/// A one-shot healing pickup
#[derive(Debug, Clone)]
pub struct Potion {
    pub body: Body,
    pub heal: i32,
    pub collected: bool,
}

impl Potion {
    pub fn new(x: f32, y: f32, heal: i32) -> Self {
        Self {
            body: Body::at(x, y),
            heal,
            collected: false,
        }
    }
}
