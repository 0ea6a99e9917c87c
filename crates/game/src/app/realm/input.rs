use isorealm_engine::{AnalogStick, InputAction, InputSnapshot, Vec2};

pub(crate) const STICK_DEADZONE: f32 = 0.4;

/// Eight facings, clockwise from north (up-right on screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum Direction {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub(crate) const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Exact-match lookup; anything off the eight literal pairs is `None`.
    pub(crate) fn from_intent(intent: MovementIntent) -> Option<Direction> {
        match (intent.dx, intent.dy) {
            (0, 2) => Some(Direction::North),
            (1, 1) => Some(Direction::NorthEast),
            (2, 0) => Some(Direction::East),
            (1, -1) => Some(Direction::SouthEast),
            (0, -2) => Some(Direction::South),
            (-1, -1) => Some(Direction::SouthWest),
            (-2, 0) => Some(Direction::West),
            (-1, 1) => Some(Direction::NorthWest),
            _ => None,
        }
    }
}

/// Integer tile-space delta summed from keys and stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MovementIntent {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

impl MovementIntent {
    pub(crate) const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub(crate) fn unit_vector(self) -> Vec2 {
        Vec2::new(self.dx as f32, self.dy as f32).normalized()
    }
}

impl std::ops::Add for MovementIntent {
    type Output = MovementIntent;

    fn add(self, rhs: MovementIntent) -> MovementIntent {
        MovementIntent::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

/// Raw stick reading kept for the debug HUD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct StickReading {
    pub(crate) angle_degrees: f32,
    pub(crate) magnitude: f32,
}

pub(crate) fn keyboard_intent(input: &InputSnapshot) -> MovementIntent {
    let mut intent = MovementIntent::default();
    if input.is_down(InputAction::Up) {
        intent = intent + MovementIntent::new(-1, 1);
    }
    if input.is_down(InputAction::Down) {
        intent = intent + MovementIntent::new(1, -1);
    }
    if input.is_down(InputAction::Left) {
        intent = intent + MovementIntent::new(-1, -1);
    }
    if input.is_down(InputAction::Right) {
        intent = intent + MovementIntent::new(1, 1);
    }
    intent
}

/// Sector lookup for a stick outside the deadzone. Cardinal sectors yield a
/// doubled single-axis delta so every sector maps to a distinct direction.
pub(crate) fn analog_intent(stick: AnalogStick) -> (MovementIntent, StickReading) {
    let magnitude = (stick.x * stick.x + stick.y * stick.y).sqrt();
    if magnitude <= STICK_DEADZONE {
        return (
            MovementIntent::default(),
            StickReading {
                angle_degrees: 0.0,
                magnitude,
            },
        );
    }

    let angle = stick.x.atan2(-stick.y).to_degrees().rem_euclid(360.0);
    let intent = match angle {
        a if !(22.5..337.5).contains(&a) => MovementIntent::new(-1, 1),
        a if a < 67.5 => MovementIntent::new(0, 2),
        a if a < 112.5 => MovementIntent::new(1, 1),
        a if a < 157.5 => MovementIntent::new(2, 0),
        a if a < 202.5 => MovementIntent::new(1, -1),
        a if a < 247.5 => MovementIntent::new(0, -2),
        a if a < 292.5 => MovementIntent::new(-1, -1),
        _ => MovementIntent::new(-2, 0),
    };
    (
        intent,
        StickReading {
            angle_degrees: angle,
            magnitude,
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedInput {
    pub(crate) intent: MovementIntent,
    pub(crate) stick: StickReading,
}

pub(crate) fn resolve_intent(input: &InputSnapshot) -> ResolvedInput {
    let keys = keyboard_intent(input);
    let gamepad = input.gamepad();
    let (pad, stick) = if gamepad.connected {
        analog_intent(gamepad.left_stick)
    } else {
        (MovementIntent::default(), StickReading::default())
    };
    ResolvedInput {
        intent: keys + pad,
        stick,
    }
}

/// Facing and moving flag after applying an intent. Unmatched intents keep
/// both values from the previous frame.
pub(crate) fn resolve_direction(
    intent: MovementIntent,
    previous: Direction,
    was_moving: bool,
) -> (Direction, bool) {
    match Direction::from_intent(intent) {
        Some(direction) => (direction, true),
        None => (previous, was_moving),
    }
}
