use thiserror::Error;

use super::gamepad::GamepadSnapshot;
use super::input::{ActionStates, InputAction};
use super::rendering::Canvas;
use super::textures::{TextureLoadError, TextureStore};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length > 0.0 {
            Vec2 {
                x: self.x / length,
                y: self.y / length,
            }
        } else {
            Vec2::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    debug_visible: bool,
    actions: ActionStates,
    gamepad: GamepadSnapshot,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        debug_visible: bool,
        actions: ActionStates,
        gamepad: GamepadSnapshot,
    ) -> Self {
        Self {
            debug_visible,
            actions,
            gamepad,
        }
    }

    /// Debug overlays are on; F3 flips this at runtime.
    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn gamepad(&self) -> GamepadSnapshot {
        self.gamepad
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_debug_visible(mut self, debug_visible: bool) -> Self {
        self.debug_visible = debug_visible;
        self
    }

    pub fn with_gamepad(mut self, gamepad: GamepadSnapshot) -> Self {
        self.gamepad = gamepad;
        self
    }
}

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to load textures: {0}")]
    Textures(#[from] TextureLoadError),
}

/// One playable scene driven by the loop.
///
/// Per redraw the loop calls `update`, then `render` into the off-screen
/// target, presents it, and finally calls `end_frame`.
pub trait Scene {
    fn load(&mut self, textures: &mut TextureStore) -> Result<(), SceneLoadError>;
    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot);
    fn render(&mut self, canvas: &mut dyn Canvas);
    fn end_frame(&mut self, dt_seconds: f32);
    fn unload(&mut self, textures: &mut TextureStore);
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_zero_vector_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn normalized_vector_has_unit_length() {
        let unit = Vec2::new(-1.0, 1.0).normalized();
        assert!((unit.length() - 1.0).abs() < 1e-6);
        assert!((unit.x + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn snapshot_builders_set_actions_and_gamepad() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Up, true)
            .with_gamepad(GamepadSnapshot::with_left_stick(0.8, 0.0))
            .with_debug_visible(true);

        assert!(snapshot.is_down(InputAction::Up));
        assert!(!snapshot.is_down(InputAction::Down));
        assert!(snapshot.gamepad().connected);
        assert!(snapshot.debug_visible());
        assert!(!InputSnapshot::empty().debug_visible());
    }
}
