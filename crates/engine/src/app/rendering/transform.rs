use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Target/offset camera: `target` lands on `offset` in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub target: Vec2,
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

pub fn world_to_screen(world: Vec2, camera: &Camera2D) -> Vec2 {
    Vec2 {
        x: (world.x - camera.target.x) * camera.zoom + camera.offset.x,
        y: (world.y - camera.target.y) * camera.zoom + camera.offset.y,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Largest aspect-preserving fit of `game` inside `window`, centred, with
/// the leftover split into letterbox or pillarbox bars.
pub fn letterbox(window: Viewport, game: Viewport) -> DestRect {
    if game.width == 0 || game.height == 0 {
        return DestRect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }
    let scale = (window.width as f32 / game.width as f32)
        .min(window.height as f32 / game.height as f32);
    let width = (game.width as f32 * scale) as u32;
    let height = (game.height as f32 * scale) as u32;
    DestRect {
        x: (window.width as i32 - width as i32) / 2,
        y: (window.height as i32 - height as i32) / 2,
        width,
        height,
    }
}
