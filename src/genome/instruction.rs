use crate::{
    constants::{
        HOPPER_HOLD_JITTER, HOPPER_HOLD_MAX, HOPPER_HOLD_MIN, HOPPER_HOLD_RANDOM_MAX,
        HOPPER_HOLD_RANDOM_MIN, HOPPER_JUMP_PROB, HOPPER_RANDOM_DIRECTION,
        HOPPER_REROLL_DIRECTION, HOPPER_REROLL_DIRECTION_PROB, HOPPER_TOGGLE_JUMP_PROB,
    },
    random::chance,
};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Horizontal intent held for the duration of an [Instruction]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Stay,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.,
            Self::Stay => 0.,
            Self::Right => 1.,
        }
    }
}

/// One discrete move: a direction held for `hold_fraction` of the maximum action window, with an
/// optional jump fired once inside that window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub wants_jump: bool,
    pub hold_fraction: f64,
    pub x_direction: Direction,
}

impl Instruction {
    /// Build an instruction, clamping `hold_fraction` into the legal range
    pub fn new(wants_jump: bool, hold_fraction: f64, x_direction: Direction) -> Self {
        Self {
            wants_jump,
            hold_fraction: hold_fraction.clamp(HOPPER_HOLD_MIN, HOPPER_HOLD_MAX),
            x_direction,
        }
    }

    /// Draw a fresh instruction. Directions are biased toward the right, so that unevolved
    /// genomes already drift toward the goal.
    pub fn random(rng: &mut impl RngCore) -> Self {
        Self {
            wants_jump: chance(rng, HOPPER_JUMP_PROB),
            hold_fraction: rng.random_range(HOPPER_HOLD_RANDOM_MIN..HOPPER_HOLD_RANDOM_MAX),
            x_direction: HOPPER_RANDOM_DIRECTION
                .pick(rng)
                .unwrap_or(Direction::Right),
        }
    }

    /// Perturb this instruction in place. The hold fraction always moves; direction re-roll and
    /// jump toggle are independent, rarer events.
    pub fn jitter(&mut self, rng: &mut impl RngCore) {
        self.hold_fraction = (self.hold_fraction
            + rng.random_range(-HOPPER_HOLD_JITTER..=HOPPER_HOLD_JITTER))
        .clamp(HOPPER_HOLD_MIN, HOPPER_HOLD_MAX);

        if chance(rng, HOPPER_REROLL_DIRECTION_PROB) {
            self.x_direction = HOPPER_REROLL_DIRECTION
                .pick(rng)
                .unwrap_or(Direction::Right);
        }

        if chance(rng, HOPPER_TOGGLE_JUMP_PROB) {
            self.wants_jump = !self.wants_jump;
        }
    }

    /// Number of frames this instruction stays active, never less than one
    #[inline]
    pub fn hold_frames(&self, max_action_frames: usize) -> usize {
        ((self.hold_fraction * max_action_frames as f64) as usize).max(1)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        (HOPPER_HOLD_MIN..=HOPPER_HOLD_MAX).contains(&self.hold_fraction)
    }
}
