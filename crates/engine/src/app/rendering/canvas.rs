use crate::app::textures::{LoadedTexture, TextureHandle, TextureStore};
use crate::app::Vec2;

use super::transform::{world_to_screen, Camera2D};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const MAGENTA: Color = Color([255, 0, 255, 255]);
    pub const GREEN: Color = Color([0, 255, 0, 255]);
    pub const DARK_GREEN: Color = Color([0, 117, 44, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }
}

/// Draw capability handed to a scene for one frame.
///
/// Positions are world pixels and pass through the active camera. Handles
/// that do not resolve to a loaded texture draw nothing.
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn set_camera(&mut self, camera: Camera2D);
    /// Tile draw at an integer position.
    fn draw_texture(&mut self, handle: TextureHandle, x: i32, y: i32);
    /// Free-standing sprite draw at a sub-pixel position.
    fn draw_quad(&mut self, handle: TextureHandle, x: f32, y: f32);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
}

/// Off-screen RGBA8 buffer at the fixed game resolution.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(px)
    }

    pub fn canvas<'a>(&'a mut self, textures: &'a TextureStore) -> TargetCanvas<'a> {
        TargetCanvas {
            target: self,
            textures,
            camera: Camera2D::default(),
        }
    }

    fn fill(&mut self, color: Color) {
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }

    fn blit(&mut self, texture: &LoadedTexture, left: i32, top: i32) {
        if texture.width == 0 || texture.height == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let expected_len = texture.width as usize * texture.height as usize * 4;
        if texture.rgba.len() < expected_len {
            return;
        }

        let draw_left = left.max(0);
        let draw_top = top.max(0);
        let draw_right = (left + texture.width as i32).min(self.width as i32);
        let draw_bottom = (top + texture.height as i32).min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        let frame_width = self.width as usize;
        let texture_width = texture.width as usize;
        for out_y in draw_top..draw_bottom {
            let src_row = (out_y - top) as usize * texture_width * 4;
            let dst_row = out_y as usize * frame_width * 4;
            for out_x in draw_left..draw_right {
                let src = src_row + (out_x - left) as usize * 4;
                let alpha = texture.rgba[src + 3];
                if alpha == 0 {
                    continue;
                }
                let dst = dst_row + out_x as usize * 4;
                blend_over(
                    &mut self.rgba[dst..dst + 4],
                    &texture.rgba[src..src + 4],
                    alpha,
                );
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[offset..offset + 4].copy_from_slice(&color.0);
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = err * 2;
            if doubled >= dy {
                err += dy;
                x += step_x;
            }
            if doubled <= dx {
                err += dx;
                y += step_y;
            }
        }
    }
}

fn blend_over(dst: &mut [u8], src: &[u8], alpha: u8) {
    if alpha == u8::MAX {
        dst.copy_from_slice(src);
        return;
    }
    let a = alpha as u32;
    let inv = 255 - a;
    for channel in 0..3 {
        dst[channel] = ((src[channel] as u32 * a + dst[channel] as u32 * inv) / 255) as u8;
    }
    dst[3] = u8::MAX;
}

pub struct TargetCanvas<'a> {
    target: &'a mut RenderTarget,
    textures: &'a TextureStore,
    camera: Camera2D,
}

impl TargetCanvas<'_> {
    fn to_screen_px(&self, x: f32, y: f32) -> (i32, i32) {
        let screen = world_to_screen(Vec2 { x, y }, &self.camera);
        (screen.x.round() as i32, screen.y.round() as i32)
    }
}

impl Canvas for TargetCanvas<'_> {
    fn clear(&mut self, color: Color) {
        self.target.fill(color);
    }

    fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    fn draw_texture(&mut self, handle: TextureHandle, x: i32, y: i32) {
        self.draw_quad(handle, x as f32, y as f32);
    }

    fn draw_quad(&mut self, handle: TextureHandle, x: f32, y: f32) {
        let Some(texture) = self.textures.get(handle) else {
            return;
        };
        let (left, top) = self.to_screen_px(x, y);
        self.target.blit(texture, left, top);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (x0, y0) = self.to_screen_px(from.x, from.y);
        let (x1, y1) = self.to_screen_px(to.x, to.y);
        self.target.line(x0, y0, x1, y1, color);
    }
}
