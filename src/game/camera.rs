//! 2D camera
//!
//! The camera is a single offset vector added to every world position at
//! draw time. Each tick it is first pointed at a target and then clamped to
//! the world, in that order; clamping first would work on last tick's
//! offset.

/// Screen-space offset applied to world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center the viewport on `(target_x, target_y)`
    pub fn follow_target(&mut self, target_x: f32, target_y: f32, viewport_w: f32, viewport_h: f32) {
        self.x = viewport_w * 0.5 - target_x;
        self.y = viewport_h * 0.5 - target_y;
    }

    /// Keep the viewport inside the world.
    ///
    /// On an axis where the world is larger than the viewport the offset is
    /// clamped to `[-(world - viewport), 0]`. Otherwise the world is centered,
    /// which leaves a positive offset (letterboxing).
    pub fn constrain(&mut self, world_w: f32, world_h: f32, viewport_w: f32, viewport_h: f32) {
        self.x = constrain_axis(self.x, world_w, viewport_w);
        self.y = constrain_axis(self.y, world_h, viewport_h);
    }

    /// Convert a world position to screen space
    pub fn to_screen(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        (world_x + self.x, world_y + self.y)
    }
}

fn constrain_axis(offset: f32, world: f32, viewport: f32) -> f32 {
    if world > viewport {
        offset.clamp(-(world - viewport), 0.0)
    } else {
        (viewport - world) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VW: f32 = 320.0;
    const VH: f32 = 240.0;

    #[test]
    fn test_follow_centers_target() {
        let mut cam = Camera::default();
        cam.follow_target(58.0, 58.0, VW, VH);
        assert_eq!(cam, Camera::new(102.0, 62.0));
        assert_eq!(cam.to_screen(58.0, 58.0), (160.0, 120.0));
    }

    #[test]
    fn test_constrain_clamps_to_world_edges() {
        let mut cam = Camera::default();

        // Near the top-left: never shows past the origin
        cam.follow_target(10.0, 10.0, VW, VH);
        cam.constrain(800.0, 600.0, VW, VH);
        assert_eq!(cam, Camera::new(0.0, 0.0));

        // Near the bottom-right: stops at world size minus viewport
        cam.follow_target(790.0, 590.0, VW, VH);
        cam.constrain(800.0, 600.0, VW, VH);
        assert_eq!(cam, Camera::new(-480.0, -360.0));
    }

    #[test]
    fn test_small_world_is_centered() {
        let mut cam = Camera::default();
        cam.follow_target(500.0, 5.0, VW, VH);
        cam.constrain(160.0, 800.0, VW, VH);
        assert_eq!(cam.x, 80.0);
        assert_eq!(cam.y, 0.0);

        // Exactly viewport-sized world sits at zero
        cam.constrain(VW, VH, VW, VH);
        assert_eq!(cam, Camera::new(0.0, 0.0));
    }

    #[test]
    fn test_constrain_is_idempotent() {
        for &(tx, ty) in &[(0.0, 0.0), (123.5, 77.0), (900.0, -40.0), (400.0, 300.0)] {
            let mut once = Camera::default();
            once.follow_target(tx, ty, VW, VH);
            once.constrain(800.0, 600.0, VW, VH);

            let mut twice = once;
            twice.constrain(800.0, 600.0, VW, VH);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_viewport_never_leaves_world() {
        let (world_w, world_h) = (640.0, 480.0);
        let mut cam = Camera::default();
        let mut tx = -100.0;
        while tx <= 800.0 {
            let ty = tx * 0.75;
            cam.follow_target(tx, ty, VW, VH);
            cam.constrain(world_w, world_h, VW, VH);
            assert!(0.0 <= -cam.x && -cam.x <= world_w - VW, "x offset {} at {}", cam.x, tx);
            assert!(0.0 <= -cam.y && -cam.y <= world_h - VH, "y offset {} at {}", cam.y, ty);
            tx += 13.0;
        }
    }
}
