//! Centralized constants for Hopper evolution parameters.
//!
//! All tunable defaults are defined here with the `HOPPER_` prefix. The config layer reads its
//! defaults from these, so a JSON config only has to name what it overrides.

use crate::{
    genome::Direction,
    random::{percent, Breakdown},
};

// ============================================================================
// Gene Parameters
// ============================================================================

/// Probability that a freshly drawn instruction requests a jump
pub const HOPPER_JUMP_PROB: u64 = percent(35);

/// Lower bound of the hold fraction for freshly drawn instructions
pub const HOPPER_HOLD_RANDOM_MIN: f64 = 0.1;

/// Upper bound of the hold fraction for freshly drawn instructions
pub const HOPPER_HOLD_RANDOM_MAX: f64 = 0.8;

/// Hold fractions are always clamped into `[HOPPER_HOLD_MIN, HOPPER_HOLD_MAX]`
pub const HOPPER_HOLD_MIN: f64 = 0.1;

/// Upper clamp for hold fractions after mutation
pub const HOPPER_HOLD_MAX: f64 = 1.0;

/// Largest absolute hold fraction delta applied by jitter
pub const HOPPER_HOLD_JITTER: f64 = 0.15;

/// Direction prior for fresh instructions, biased toward moving right
pub const HOPPER_RANDOM_DIRECTION: Breakdown<Direction, 3> = Breakdown::new([
    (Direction::Left, percent(5)),
    (Direction::Stay, percent(15)),
    (Direction::Right, percent(80)),
]);

/// Direction prior used when jitter re-rolls an instruction's direction
pub const HOPPER_REROLL_DIRECTION: Breakdown<Direction, 3> = Breakdown::new([
    (Direction::Left, percent(16)),
    (Direction::Stay, percent(17)),
    (Direction::Right, percent(67)),
]);

/// Probability that jitter re-rolls the direction of an instruction
pub const HOPPER_REROLL_DIRECTION_PROB: u64 = percent(25);

/// Probability that jitter toggles the jump request of an instruction
pub const HOPPER_TOGGLE_JUMP_PROB: u64 = percent(15);

// ============================================================================
// Evolution Parameters
// ============================================================================

pub const HOPPER_POPULATION_SIZE: usize = 80;

pub const HOPPER_GENOME_LENGTH: usize = 80;

/// Per-instruction probability of in-place jitter
pub const HOPPER_MUTATION_RATE: f64 = 0.20;

/// Per-instruction probability of wholesale replacement
pub const HOPPER_REPLACE_RATE: f64 = 0.10;

/// Number of best genotypes copied unchanged into the next generation
pub const HOPPER_ELITISM_COUNT: usize = 12;

pub const HOPPER_MAX_GENERATIONS: usize = 1000;

/// Fitness at or above which a run can only have reached the goal
pub const HOPPER_WIN_FITNESS_THRESHOLD: f64 = 1_500_000.0;

/// Hard ceiling on simulated frames per run (five minutes at 60 frames per second)
pub const HOPPER_FRAME_BUDGET: usize = 18_000;

/// Champion instruction count before the final demonstration, relative to genome length
pub const HOPPER_DEMO_GROWTH: f64 = 1.2;

// ============================================================================
// Physics Parameters
// ============================================================================

pub const HOPPER_SCREEN_WIDTH: f64 = 800.0;

pub const HOPPER_SCREEN_HEIGHT: f64 = 600.0;

pub const HOPPER_GRAVITY: f64 = 0.8;

/// Upward velocity applied by a jump
pub const HOPPER_JUMP_IMPULSE: f64 = 15.0;

pub const HOPPER_MAX_FALL_SPEED: f64 = 15.0;

/// Horizontal world distance covered per frame while moving
pub const HOPPER_MOVE_SPEED: f64 = 5.0;

/// Frames an instruction with a hold fraction of 1.0 stays active
pub const HOPPER_MAX_ACTION_FRAMES: usize = 30;

pub const HOPPER_AGENT_WIDTH: f64 = 75.0;

pub const HOPPER_AGENT_HEIGHT: f64 = 75.0;

/// Fixed screen x of the agent; the world scrolls beneath it
pub const HOPPER_AGENT_SCREEN_X: f64 = 100.0;

/// Agent start height above the screen bottom when a level has no platforms
pub const HOPPER_AGENT_FALLBACK_LIFT: f64 = 70.0;

/// Distance below the screen bottom past which an agent counts as fallen off
pub const HOPPER_FALL_MARGIN: f64 = 200.0;

/// Consecutive frames without horizontal progress before a run is stopped
pub const HOPPER_STAGNATION_LIMIT: usize = 240;

/// Horizontal movement per frame below which a frame counts as stagnant
pub const HOPPER_PROGRESS_THRESHOLD: f64 = 1.0;

/// Tolerance for the previous-frame edge test of one-sided collisions
pub const HOPPER_LANDING_EPSILON: f64 = 1.0;

// ============================================================================
// Level Parameters
// ============================================================================

/// Height of every user-authored platform, whatever the level file says
pub const HOPPER_PLATFORM_HEIGHT: f64 = 30.0;

pub const HOPPER_GROUND_X: f64 = -200.0;

/// Width of the starting ground, including the part left of the start
pub const HOPPER_GROUND_WIDTH: f64 = 500.0;

pub const HOPPER_GROUND_HEIGHT: f64 = 50.0;

pub const HOPPER_WALL_WIDTH: f64 = 10.0;

pub const HOPPER_GOAL_WIDTH: f64 = 160.0;

pub const HOPPER_GOAL_HEIGHT: f64 = 160.0;

// ============================================================================
// Reward Shaping
// ============================================================================

/// Fitness per unit of furthest world x reached
pub const HOPPER_DISTANCE_WEIGHT: f64 = 1.5;

/// Fitness lost per unit of leftward movement
pub const HOPPER_LEFTWARD_WEIGHT: f64 = 5.0;

/// Final world x below which the far-left penalty applies
pub const HOPPER_FAR_LEFT_THRESHOLD: f64 = -100.0;

pub const HOPPER_FAR_LEFT_PENALTY: f64 = 20_000.0;

pub const HOPPER_WIN_BONUS: f64 = 2_000_000.0;

/// Bonus per instruction a winner never consumed
pub const HOPPER_UNUSED_INSTRUCTION_BONUS: f64 = 200.0;

/// Furthest world x below which a non-winning run counts as making no progress
pub const HOPPER_MIN_PROGRESS: f64 = 50.0;

pub const HOPPER_NO_PROGRESS_PENALTY: f64 = 50_000.0;

/// Fitness per frame survived by a non-winning, non-stagnant run
pub const HOPPER_SURVIVAL_BONUS: f64 = 0.01;

/// Fixed fitness of a run that fell off the world
pub const HOPPER_FALL_OFF_PENALTY: f64 = -300_000.0;

/// Seed used when no entropy source is readable
pub const HOPPER_FALLBACK_SEED: u64 = 0x5eed_0f_4a11_0f_f5;
