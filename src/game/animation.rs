//! Sprite animation
//!
//! Frame bookkeeping for the player's walk cycles. An [`Animation`] walks
//! frame indices `first, first + step, ...` up to `last`, holding each for
//! `speed` ticks. A [`SpriteSheet`] turns a frame index into the source
//! rectangle inside the sheet image.

use serde::{Deserialize, Serialize};

use crate::asset::SourceRect;

/// Looping frame sequence advanced once per tick while active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnimationDef", into = "AnimationDef")]
pub struct Animation {
    pub first: u32,
    pub last: u32,
    pub step: u32,
    /// Ticks each frame stays on screen
    pub speed: u32,
    frame: u32,
    counter: u32,
}

impl Animation {
    pub fn new(first: u32, last: u32, step: u32, speed: u32) -> Self {
        Self {
            first,
            last,
            step: step.max(1),
            speed: speed.max(1),
            frame: first,
            counter: 0,
        }
    }

    /// Advance by one tick
    pub fn update(&mut self) {
        self.counter += 1;
        if self.counter < self.speed {
            return;
        }
        self.counter = 0;
        self.frame += self.step;
        if self.frame > self.last {
            self.frame = self.first;
        }
    }

    /// Current frame index into the sprite sheet
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) {
        self.frame = self.first;
        self.counter = 0;
    }
}

/// On-disk shape: only the sequence, never the playback position
#[derive(Serialize, Deserialize)]
struct AnimationDef {
    first: u32,
    last: u32,
    step: u32,
    speed: u32,
}

impl From<AnimationDef> for Animation {
    fn from(def: AnimationDef) -> Self {
        Animation::new(def.first, def.last, def.step, def.speed)
    }
}

impl From<Animation> for AnimationDef {
    fn from(anim: Animation) -> Self {
        AnimationDef {
            first: anim.first,
            last: anim.last,
            step: anim.step,
            speed: anim.speed,
        }
    }
}

/// Grid of equally sized frames laid out row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub columns: u32,
    pub rows: u32,
    /// Frame edge length in pixels
    pub tile: u32,
}

impl SpriteSheet {
    pub fn new(columns: u32, rows: u32, tile: u32) -> Self {
        Self { columns, rows, tile }
    }

    /// Source rectangle of frame `index`
    pub fn rect(&self, index: u32) -> SourceRect {
        let columns = self.columns.max(1);
        let col = index % columns;
        let row = index / columns;
        SourceRect::new(col * self.tile, row * self.tile, self.tile, self.tile)
    }

    /// Number of frames on the sheet
    pub fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_each_frame_for_speed_ticks() {
        let mut anim = Animation::new(7, 15, 4, 3);
        assert_eq!(anim.frame(), 7);

        anim.update();
        anim.update();
        assert_eq!(anim.frame(), 7);
        anim.update();
        assert_eq!(anim.frame(), 11);
    }

    #[test]
    fn test_wraps_after_last() {
        let mut anim = Animation::new(4, 12, 4, 1);
        let frames: Vec<u32> = (0..4)
            .map(|_| {
                anim.update();
                anim.frame()
            })
            .collect();
        assert_eq!(frames, vec![8, 12, 4, 8]);

        anim.reset();
        assert_eq!(anim.frame(), 4);
    }

    #[test]
    fn test_deserialize_starts_at_first_frame() {
        let anim: Animation = ron::from_str("(first: 5, last: 13, step: 4, speed: 20)").unwrap();
        assert_eq!(anim, Animation::new(5, 13, 4, 20));
        assert_eq!(anim.frame(), 5);
    }

    #[test]
    fn test_sheet_rect() {
        let sheet = SpriteSheet::new(4, 7, 16);
        assert_eq!(sheet.rect(0), SourceRect::new(0, 0, 16, 16));
        assert_eq!(sheet.rect(7), SourceRect::new(48, 16, 16, 16));
        assert_eq!(sheet.rect(13), SourceRect::new(16, 48, 16, 16));
        assert_eq!(sheet.frame_count(), 28);
    }
}
