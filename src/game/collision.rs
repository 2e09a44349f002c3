//! Collision System
//!
//! Axis-separated AABB resolution of a moving body against static
//! rectangles. Motion is applied and resolved one axis at a time, X first
//! and then Y, so a diagonal step can never slip between two colliders and
//! the outcome at corners is deterministic.
//!
//! Colliders are checked in list order and each push-out is visible to the
//! checks after it. At this scale a linear scan is enough.

use super::body::{Body, Rect};

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Push `body` out of every collider it overlaps along `axis`.
///
/// Call after moving along that axis only. A body moving positive is
/// placed flush against the collider's near edge (`min - size`), a body
/// moving negative against its far edge (`max`). A body that overlaps with
/// zero velocity on the axis is left where it is.
pub fn resolve_axis(body: &mut Body, colliders: &[Rect], axis: Axis) {
    for collider in colliders {
        if !collider.overlaps(&body.rect()) {
            continue;
        }
        match axis {
            Axis::X => {
                if body.dx > 0.0 {
                    body.x = collider.x - Body::SIZE;
                } else if body.dx < 0.0 {
                    body.x = collider.right();
                }
            }
            Axis::Y => {
                if body.dy > 0.0 {
                    body.y = collider.y - Body::SIZE;
                } else if body.dy < 0.0 {
                    body.y = collider.bottom();
                }
            }
        }
    }
}

/// Apply this tick's velocity: X motion, X resolution, Y motion, Y resolution
pub fn move_and_collide(body: &mut Body, colliders: &[Rect]) {
    body.x += body.dx;
    resolve_axis(body, colliders, Axis::X);

    body.y += body.dy;
    resolve_axis(body, colliders, Axis::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Vec<Rect> {
        vec![Rect::from_min_max(100.0, 100.0, 116.0, 116.0)]
    }

    fn moving(x: f32, y: f32, dx: f32, dy: f32) -> Body {
        Body { x, y, dx, dy }
    }

    #[test]
    fn test_positive_x_clamps_to_near_edge() {
        let colliders = block();
        let mut body = moving(90.0, 100.0, 2.0, 0.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!(body.x, 100.0 - Body::SIZE);
        assert_eq!(body.rect().right(), colliders[0].x);
        assert!(!body.rect().overlaps(&colliders[0]));
    }

    #[test]
    fn test_negative_x_clamps_to_far_edge() {
        let colliders = block();
        let mut body = moving(117.0, 104.0, -2.0, 0.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!(body.x, 116.0);
    }

    #[test]
    fn test_vertical_edges() {
        let colliders = block();

        let mut falling = moving(100.0, 83.0, 0.0, 2.0);
        move_and_collide(&mut falling, &colliders);
        assert_eq!(falling.y, 84.0);

        let mut rising = moving(108.0, 117.0, 0.0, -2.0);
        move_and_collide(&mut rising, &colliders);
        assert_eq!(rising.y, 116.0);
    }

    #[test]
    fn test_zero_velocity_overlap_is_left_alone() {
        let colliders = block();
        let mut body = moving(105.0, 105.0, 0.0, 0.0);
        resolve_axis(&mut body, &colliders, Axis::X);
        resolve_axis(&mut body, &colliders, Axis::Y);
        assert_eq!((body.x, body.y), (105.0, 105.0));
    }

    #[test]
    fn test_only_the_given_axis_is_resolved() {
        let colliders = block();
        // Overlapping, moving on X only: a Y pass does nothing
        let mut body = moving(90.0, 95.0, 2.0, 0.0);
        resolve_axis(&mut body, &colliders, Axis::Y);
        assert_eq!((body.x, body.y), (90.0, 95.0));
        resolve_axis(&mut body, &colliders, Axis::X);
        assert_eq!(body.x, 84.0);
    }

    #[test]
    fn test_touching_is_not_colliding() {
        let colliders = block();
        let mut body = moving(82.0, 100.0, 2.0, 0.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!(body.x, 84.0);
    }

    #[test]
    fn test_diagonal_into_corner_does_not_tunnel() {
        let colliders = block();

        // Aimed exactly at the top-left corner: rests against it
        let mut body = moving(76.0, 76.0, 8.0, 8.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!((body.x, body.y), (84.0, 84.0));
        assert_eq!(body.rect().right(), colliders[0].x);
        assert_eq!(body.rect().bottom(), colliders[0].y);

        // Past the corner: X pass finds nothing, Y pass lands on the top edge
        let mut body = moving(80.0, 80.0, 8.0, 8.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!((body.x, body.y), (88.0, 84.0));
        assert!(!body.rect().overlaps(&colliders[0]));
    }

    #[test]
    fn test_axis_order_decides_corner_outcome() {
        let colliders = block();

        let mut x_first = moving(80.0, 80.0, 8.0, 8.0);
        move_and_collide(&mut x_first, &colliders);

        // Same step resolved Y before X ends on the left face instead
        let mut y_first = moving(80.0, 80.0, 8.0, 8.0);
        y_first.y += y_first.dy;
        resolve_axis(&mut y_first, &colliders, Axis::Y);
        y_first.x += y_first.dx;
        resolve_axis(&mut y_first, &colliders, Axis::X);

        assert_eq!((x_first.x, x_first.y), (88.0, 84.0));
        assert_eq!((y_first.x, y_first.y), (84.0, 88.0));
    }

    #[test]
    fn test_colliders_resolved_in_order() {
        // Two abutting blocks; the second push-out sees the first one's result
        let colliders = vec![
            Rect::from_min_max(100.0, 0.0, 116.0, 16.0),
            Rect::from_min_max(90.0, 0.0, 100.0, 16.0),
        ];
        let mut body = moving(80.0, 0.0, 10.0, 0.0);
        move_and_collide(&mut body, &colliders);
        assert_eq!(body.x, 74.0);
    }
}
