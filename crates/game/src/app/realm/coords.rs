//! Isometric tile-space to screen-space mapping.
//!
//! Tile space is the continuous `(u, v)` grid. Screen space is world pixels
//! before the camera is applied.

use isorealm_engine::Vec2;

pub(crate) const TILE_WIDTH: f32 = 256.0;
pub(crate) const TILE_HEIGHT: f32 = 128.0;
/// Height of a full tile sprite including the wall/object body above the diamond.
pub(crate) const TILE_FULL_HEIGHT: f32 = 512.0;

const VERTICAL_LIFT: f32 = TILE_FULL_HEIGHT - TILE_HEIGHT;

pub(crate) fn tile_to_screen(u: f32, v: f32) -> Vec2 {
    Vec2 {
        x: (u + v) * 0.5 * TILE_WIDTH,
        y: (u - v) * 0.5 * TILE_HEIGHT - VERTICAL_LIFT,
    }
}

/// Draw-call position. Truncates toward zero so tiles land on exact pixels.
pub(crate) fn tile_to_screen_i32(u: f32, v: f32) -> (i32, i32) {
    let screen = tile_to_screen(u, v);
    (screen.x as i32, screen.y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_to_tile(screen: Vec2) -> Vec2 {
        let sum = screen.x / (0.5 * TILE_WIDTH);
        let diff = (screen.y + VERTICAL_LIFT) / (0.5 * TILE_HEIGHT);
        Vec2 {
            x: (sum + diff) * 0.5,
            y: (sum - diff) * 0.5,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn origin_maps_to_lifted_zero() {
        let p = tile_to_screen(0.0, 0.0);
        assert_eq!(p, Vec2::new(0.0, -384.0));
    }

    #[test]
    fn unit_steps_follow_the_diamond() {
        assert_eq!(tile_to_screen(1.0, 0.0), Vec2::new(128.0, 64.0 - 384.0));
        assert_eq!(tile_to_screen(0.0, 1.0), Vec2::new(128.0, -64.0 - 384.0));
        assert_eq!(tile_to_screen(5.5, 5.5), Vec2::new(1408.0, -384.0));
    }

    #[test]
    fn mapping_is_affine_in_both_axes() {
        let origin = tile_to_screen(0.0, 0.0);
        let a = tile_to_screen(2.25, -1.5);
        let b = tile_to_screen(-0.75, 3.0);
        let sum = tile_to_screen(2.25 - 0.75, -1.5 + 3.0);
        assert!(approx(sum.x, a.x + b.x - origin.x));
        assert!(approx(sum.y, a.y + b.y - origin.y));
    }

    #[test]
    fn inverse_recovers_tile_coordinates() {
        for &(u, v) in &[(0.0, 0.0), (5.5, 5.5), (11.0, 0.0), (3.2, 9.7), (-1.25, 4.5)] {
            let back = screen_to_tile(tile_to_screen(u, v));
            assert!(approx(back.x, u), "u {u} -> {}", back.x);
            assert!(approx(back.y, v), "v {v} -> {}", back.y);
        }
    }

    #[test]
    fn integer_variant_truncates_toward_zero() {
        // (0.3, 0.1): x = 51.2, y = 12.8 - 384 = -371.2
        assert_eq!(tile_to_screen_i32(0.3, 0.1), (51, -371));
        // (0.0, 0.01): x = 1.28, y = -0.64 - 384 = -384.64
        assert_eq!(tile_to_screen_i32(0.0, 0.01), (1, -384));
    }
}
