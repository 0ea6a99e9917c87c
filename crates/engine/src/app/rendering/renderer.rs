use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::canvas::{Color, RenderTarget};
use super::hud::draw_hud;
use super::transform::{letterbox, DestRect, Viewport};

const LETTERBOX_COLOR: Color = Color::BLACK;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    target: RenderTarget,
}

impl Renderer {
    pub fn new(window: Arc<Window>, game: Viewport) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            target: RenderTarget::new(game.width, game.height),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub fn target_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }

    /// Scales the off-screen target into the window and draws the HUD on top.
    pub fn present(&mut self, hud_lines: Option<&[String]>) -> Result<(), Error> {
        let window = self.viewport;
        let dest = letterbox(
            window,
            Viewport {
                width: self.target.width(),
                height: self.target.height(),
            },
        );
        let frame = self.pixels.frame_mut();
        composite_scaled(frame, window, &self.target, dest);
        if let Some(lines) = hud_lines {
            draw_hud(frame, window.width, window.height, lines);
        }
        self.pixels.render()
    }
}

/// Clears `frame` to the bar colour and nearest-samples `source` into `dest`.
pub(crate) fn composite_scaled(
    frame: &mut [u8],
    window: Viewport,
    source: &RenderTarget,
    dest: DestRect,
) {
    for px in frame.chunks_exact_mut(4) {
        px.copy_from_slice(&LETTERBOX_COLOR.0);
    }
    if dest.width == 0 || dest.height == 0 || source.width() == 0 || source.height() == 0 {
        return;
    }
    let expected_len = window.width as usize * window.height as usize * 4;
    if frame.len() < expected_len {
        return;
    }

    let x_ratio = source.width() as f32 / dest.width as f32;
    let y_ratio = source.height() as f32 / dest.height as f32;
    let src = source.rgba();
    let src_width = source.width() as usize;

    let top = dest.y.max(0);
    let bottom = (dest.y + dest.height as i32).min(window.height as i32);
    let left = dest.x.max(0);
    let right = (dest.x + dest.width as i32).min(window.width as i32);

    for out_y in top..bottom {
        let src_y = (((out_y - dest.y) as f32 * y_ratio) as u32).min(source.height() - 1);
        let src_row = src_y as usize * src_width * 4;
        let dst_row = out_y as usize * window.width as usize * 4;
        for out_x in left..right {
            let src_x = (((out_x - dest.x) as f32 * x_ratio) as u32).min(source.width() - 1);
            let s = src_row + src_x as usize * 4;
            let d = dst_row + out_x as usize * 4;
            frame[d..d + 3].copy_from_slice(&src[s..s + 3]);
            frame[d + 3] = u8::MAX;
        }
    }
}
