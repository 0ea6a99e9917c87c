mod canvas;
mod hud;
mod renderer;
mod transform;

pub use canvas::{Canvas, Color, RenderTarget, TargetCanvas};
pub(crate) use renderer::Renderer;
pub use transform::{letterbox, world_to_screen, Camera2D, DestRect, Viewport};
