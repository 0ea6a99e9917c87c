use isorealm_engine::Vec2;

use super::animation::AnimationState;
use super::input::{Direction, MovementIntent};
use super::world::WorldSize;

/// The player avatar. Lives for the whole session.
#[derive(Debug)]
pub(crate) struct Actor {
    pub(crate) position: Vec2,
    pub(crate) direction: Direction,
    pub(crate) is_moving: bool,
    pub(crate) animation: AnimationState,
}

impl Actor {
    pub(crate) fn spawn(position: Vec2) -> Self {
        Self {
            position,
            direction: Direction::default(),
            is_moving: false,
            animation: AnimationState::new(),
        }
    }
}

/// New position after moving along `intent` for `dt_seconds`, kept inside
/// the world.
pub(crate) fn integrate(
    position: Vec2,
    intent: MovementIntent,
    speed: f32,
    dt_seconds: f32,
    world: WorldSize,
) -> Vec2 {
    let step = intent.unit_vector();
    world.clamp(Vec2::new(
        position.x + step.x * speed * dt_seconds,
        position.y + step.y * speed * dt_seconds,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_ACTOR_SPEED: f32 = 3.0;
    const REALM: WorldSize = WorldSize {
        width: 12,
        height: 12,
    };

    #[test]
    fn down_left_for_one_second_moves_three_tiles() {
        let start = REALM.center();
        let moved = integrate(
            start,
            MovementIntent::new(0, -2),
            DEFAULT_ACTOR_SPEED,
            1.0,
            REALM,
        );
        assert!((moved.x - 5.5).abs() < 1e-5);
        assert!((moved.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let moved = integrate(
            Vec2::new(5.0, 5.0),
            MovementIntent::new(1, 1),
            DEFAULT_ACTOR_SPEED,
            1.0,
            REALM,
        );
        let travelled = Vec2::new(moved.x - 5.0, moved.y - 5.0).length();
        assert!((travelled - 3.0).abs() < 1e-5);
    }

    #[test]
    fn movement_clamps_to_world_bounds() {
        let moved = integrate(
            Vec2::new(5.5, 1.0),
            MovementIntent::new(0, -2),
            DEFAULT_ACTOR_SPEED,
            1.0,
            REALM,
        );
        assert_eq!(moved, Vec2::new(5.5, 0.0));

        let moved = integrate(
            Vec2::new(10.5, 5.5),
            MovementIntent::new(2, 0),
            DEFAULT_ACTOR_SPEED,
            1.0,
            REALM,
        );
        assert_eq!(moved, Vec2::new(11.0, 5.5));
    }

    #[test]
    fn zero_intent_stays_put() {
        let start = Vec2::new(2.0, 9.0);
        assert_eq!(
            integrate(start, MovementIntent::default(), DEFAULT_ACTOR_SPEED, 0.5, REALM),
            start
        );
    }

    #[test]
    fn spawn_starts_idle_facing_north() {
        let actor = Actor::spawn(REALM.center());
        assert_eq!(actor.position, Vec2::new(5.5, 5.5));
        assert_eq!(actor.direction, Direction::North);
        assert!(!actor.is_moving);
        assert_eq!(actor.animation.accumulator(), 0.0);
    }
}
