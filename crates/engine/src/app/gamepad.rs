//! Gamepad polling seam.
//!
//! The loop asks a [`GamepadSource`] for one [`GamepadSnapshot`] per frame.
//! Stick axes follow the screen convention: `+x` is right, `+y` is down.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalogStick {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub connected: bool,
    pub left_stick: AnalogStick,
}

impl GamepadSnapshot {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn with_left_stick(x: f32, y: f32) -> Self {
        Self {
            connected: true,
            left_stick: AnalogStick { x, y },
        }
    }
}

pub(crate) trait GamepadSource {
    fn poll(&mut self) -> GamepadSnapshot;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NoGamepad;

impl GamepadSource for NoGamepad {
    fn poll(&mut self) -> GamepadSnapshot {
        GamepadSnapshot::disconnected()
    }
}

pub(crate) fn default_gamepad_source() -> Box<dyn GamepadSource> {
    #[cfg(feature = "gamepad")]
    {
        match gilrs_backend::GilrsGamepad::new() {
            Ok(source) => return Box::new(source),
            Err(error) => {
                tracing::warn!(error = %error, "gamepad_backend_unavailable");
            }
        }
    }
    #[cfg(not(feature = "gamepad"))]
    tracing::info!(feature = "gamepad", "gamepad_backend_not_built");
    Box::new(NoGamepad)
}

#[cfg(feature = "gamepad")]
mod gilrs_backend {
    use gilrs::{Axis, Gilrs};

    use super::{AnalogStick, GamepadSnapshot, GamepadSource};

    pub(crate) struct GilrsGamepad {
        gilrs: Gilrs,
    }

    impl GilrsGamepad {
        pub(crate) fn new() -> Result<Self, gilrs::Error> {
            Ok(Self {
                gilrs: Gilrs::new()?,
            })
        }
    }

    impl GamepadSource for GilrsGamepad {
        fn poll(&mut self) -> GamepadSnapshot {
            while self.gilrs.next_event().is_some() {}

            let Some((_, pad)) = self.gilrs.gamepads().find(|(_, pad)| pad.is_connected())
            else {
                return GamepadSnapshot::disconnected();
            };

            // gilrs reports +y as stick up.
            GamepadSnapshot {
                connected: true,
                left_stick: AnalogStick {
                    x: pad.value(Axis::LeftStickX),
                    y: -pad.value(Axis::LeftStickY),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_gamepad_always_reports_disconnected() {
        let mut source = NoGamepad;
        let snapshot = source.poll();
        assert!(!snapshot.connected);
        assert_eq!(snapshot.left_stick, AnalogStick::default());
    }

    #[cfg(not(feature = "gamepad"))]
    #[test]
    fn default_source_without_backend_reports_disconnected() {
        let mut source = default_gamepad_source();
        assert_eq!(source.poll(), GamepadSnapshot::disconnected());
    }

    #[test]
    fn left_stick_constructor_marks_pad_connected() {
        let snapshot = GamepadSnapshot::with_left_stick(0.5, -0.25);
        assert!(snapshot.connected);
        assert_eq!(snapshot.left_stick, AnalogStick { x: 0.5, y: -0.25 });
    }
}
