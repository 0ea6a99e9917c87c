mod gamepad;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod textures;

pub use gamepad::{AnalogStick, GamepadSnapshot};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    letterbox, world_to_screen, Camera2D, Canvas, Color, DestRect, RenderTarget, TargetCanvas,
    Viewport,
};
pub use scene::{InputSnapshot, Scene, SceneLoadError, Vec2};
pub use textures::{
    LoadedTexture, TextureDirectory, TextureHandle, TextureLoadError, TextureStore,
};
