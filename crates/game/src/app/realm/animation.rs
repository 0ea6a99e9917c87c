use super::rng::MersenneTwister;

pub(crate) const RUN_FRAMES_PER_SECOND: f32 = 15.0;
pub(crate) const PICKUP_FRAMES_PER_SECOND: f32 = 10.0;
pub(crate) const FRAMES_PER_CYCLE: f32 = 10.0;
/// Idle time before the first pickup cycle starts.
pub(crate) const IDLE_WAIT_SECONDS: f32 = 2.0;
pub(crate) const IDLE_JITTER_SEED: u64 = 100;
pub(crate) const IDLE_JITTER_MIN: f64 = 1.0;
pub(crate) const IDLE_JITTER_MAX: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CharacterPose {
    Idle,
    Run(u8),
    Pickup(u8),
}

impl CharacterPose {
    pub(crate) const SLOTS: usize = 21;

    /// Position inside one direction's block of the character table.
    pub(crate) fn slot(self) -> usize {
        match self {
            CharacterPose::Idle => 0,
            CharacterPose::Run(frame) => 1 + usize::from(frame.min(9)),
            CharacterPose::Pickup(frame) => 11 + usize::from(frame.min(9)),
        }
    }

    pub(crate) fn texture_suffix(self) -> String {
        match self {
            CharacterPose::Idle => "Idle0".to_string(),
            CharacterPose::Run(frame) => format!("Run{frame}"),
            CharacterPose::Pickup(frame) => format!("Pickup{frame}"),
        }
    }

    pub(crate) fn all() -> impl Iterator<Item = CharacterPose> {
        std::iter::once(CharacterPose::Idle)
            .chain((0..10).map(CharacterPose::Run))
            .chain((0..10).map(CharacterPose::Pickup))
    }
}

/// Timer-driven pose selection for the actor.
///
/// The accumulator grows by frame time, drops to zero on every moving/idle
/// edge, and is knocked back by a random amount after each pickup cycle so
/// idle fidgets come at uneven intervals.
#[derive(Debug)]
pub(crate) struct AnimationState {
    accumulator: f32,
    was_moving: bool,
    jitter: MersenneTwister,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationState {
    pub(crate) fn new() -> Self {
        Self {
            accumulator: 0.0,
            was_moving: false,
            jitter: MersenneTwister::new(IDLE_JITTER_SEED),
        }
    }

    pub(crate) fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Pose for this frame. Finishing a pickup cycle pushes the accumulator
    /// back by `[1, 6)` seconds drawn from the jitter stream, then reseeds
    /// that stream from the clock for the next cycle.
    pub(crate) fn select_pose(&mut self, is_moving: bool) -> CharacterPose {
        if is_moving {
            let frame = (self.accumulator * RUN_FRAMES_PER_SECOND) % FRAMES_PER_CYCLE;
            return CharacterPose::Run(frame as u8);
        }
        if self.accumulator <= IDLE_WAIT_SECONDS {
            return CharacterPose::Idle;
        }

        let scaled = (self.accumulator - IDLE_WAIT_SECONDS) * PICKUP_FRAMES_PER_SECOND;
        let frame = (scaled % FRAMES_PER_CYCLE) as u8;
        if frame == 0 && scaled > FRAMES_PER_CYCLE - 1.0 {
            let cooldown = self.jitter.uniform(IDLE_JITTER_MIN, IDLE_JITTER_MAX);
            self.jitter.reseed_from_clock();
            self.accumulator -= cooldown as f32;
            tracing::trace!(cooldown, "idle_cycle_complete");
            return CharacterPose::Idle;
        }
        CharacterPose::Pickup(frame)
    }

    /// Advances the timer. A moving/idle edge resets it to zero.
    pub(crate) fn end_frame(&mut self, dt_seconds: f32, is_moving: bool) {
        self.accumulator += dt_seconds;
        if self.was_moving != is_moving {
            self.accumulator = 0.0;
        }
        self.was_moving = is_moving;
    }
}
