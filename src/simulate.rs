//! The fitness function: run one [Genotype] against a [Level] frame by frame and score how far
//! it got.

use crate::{
    constants::*,
    genome::{Genotype, Instruction},
    geometry::Aabb,
    level::Level,
    physics::{Body, Contact, Physics},
};
use serde::{Deserialize, Serialize};

/// Reward shaping constants. Exact magnitudes are tunable, but their ordering is not: a win
/// beats any non-winning run, falling off is worse than any other outcome, and stagnating
/// earns no survival bonus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    pub distance_weight: f64,
    pub leftward_weight: f64,
    pub far_left_threshold: f64,
    pub far_left_penalty: f64,
    pub win_bonus: f64,
    pub unused_instruction_bonus: f64,
    pub min_progress: f64,
    pub no_progress_penalty: f64,
    pub survival_bonus: f64,
    pub fall_off_penalty: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            distance_weight: HOPPER_DISTANCE_WEIGHT,
            leftward_weight: HOPPER_LEFTWARD_WEIGHT,
            far_left_threshold: HOPPER_FAR_LEFT_THRESHOLD,
            far_left_penalty: HOPPER_FAR_LEFT_PENALTY,
            win_bonus: HOPPER_WIN_BONUS,
            unused_instruction_bonus: HOPPER_UNUSED_INSTRUCTION_BONUS,
            min_progress: HOPPER_MIN_PROGRESS,
            no_progress_penalty: HOPPER_NO_PROGRESS_PENALTY,
            survival_bonus: HOPPER_SURVIVAL_BONUS,
            fall_off_penalty: HOPPER_FALL_OFF_PENALTY,
        }
    }
}

impl RewardPolicy {
    /// Score a finished run. A fall-off short-circuits to the fixed penalty; every other
    /// non-winning outcome stays strictly above it.
    pub fn score(&self, tally: &Tally, end: RunEnd, unused: usize) -> f64 {
        if end == RunEnd::FellOff {
            return self.fall_off_penalty;
        }

        let mut fitness =
            tally.max_world_x * self.distance_weight - tally.leftward * self.leftward_weight;
        if tally.world_x < self.far_left_threshold {
            fitness -= self.far_left_penalty;
        }

        if end == RunEnd::Won {
            return fitness + self.win_bonus + unused as f64 * self.unused_instruction_bonus;
        }

        if tally.max_world_x < self.min_progress {
            fitness -= self.no_progress_penalty;
        } else if end != RunEnd::Stagnated {
            fitness += tally.frames as f64 * self.survival_bonus;
        }

        fitness.max(self.fall_off_penalty + 1.)
    }

    /// Highest fitness any non-winning run can reach within `frame_budget` frames
    pub fn non_winning_ceiling(&self, physics: &Physics, frame_budget: usize) -> f64 {
        let frames = frame_budget as f64;
        physics.move_speed * frames * self.distance_weight + frames * self.survival_bonus
    }

    /// Lowest fitness any winning run can score within `frame_budget` frames
    pub fn winning_floor(&self, physics: &Physics, frame_budget: usize) -> f64 {
        let frames = frame_budget as f64;
        self.win_bonus - physics.move_speed * frames * self.leftward_weight - self.far_left_penalty
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunEnd {
    /// touched the goal
    Won,
    /// every instruction was consumed
    Exhausted,
    /// no horizontal progress for longer than the stagnation limit
    Stagnated,
    /// dropped far below the screen
    FellOff,
    /// hit the hard frame ceiling
    FrameBudget,
}

/// Progress bookkeeping for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub world_x: f64,
    pub max_world_x: f64,
    pub leftward: f64,
    pub frames: usize,
    pub stagnation: usize,
    last_check_x: f64,
}

impl Tally {
    fn advance(&mut self, dx: f64, threshold: f64) {
        self.world_x += dx;
        if dx < 0. {
            self.leftward -= dx;
        }
        if self.world_x > self.max_world_x {
            self.max_world_x = self.world_x;
        }

        if (self.world_x - self.last_check_x).abs() < threshold {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }
        self.last_check_x = self.world_x;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub fitness: f64,
    pub end: RunEnd,
    pub frames_survived: usize,
    pub final_cursor: usize,
    pub world_x: f64,
    pub max_world_x: f64,
    pub leftward: f64,
}

impl RunOutcome {
    #[inline]
    pub fn won(&self) -> bool {
        self.end == RunEnd::Won
    }
}

/// What an [Observer] sees after each frame, including the one that ends the run. Positions are
/// in the camera frame, where the agent's x stays fixed and the world is shifted by `-world_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub world_x: f64,
    pub body: Body,
    pub instruction: Instruction,
    pub cursor: usize,
    pub stagnation: usize,
    /// set on the frame that won, fell off or stagnated
    pub end: Option<RunEnd>,
}

/// A side channel onto a run, for renderers and recorders. Observers cannot alter the run.
pub trait Observer {
    fn observe(&mut self, frame: &Frame);
}

impl Observer for () {
    #[inline]
    fn observe(&mut self, _: &Frame) {}
}

impl Observer for Vec<Frame> {
    fn observe(&mut self, frame: &Frame) {
        self.push(*frame);
    }
}

/// Emits every frame as a `trace` event
pub struct FrameLog;

impl Observer for FrameLog {
    fn observe(&mut self, frame: &Frame) {
        tracing::trace!(
            frame = frame.index,
            world_x = frame.world_x,
            y = frame.body.aabb.y,
            vel_y = frame.body.vel_y,
            on_ground = frame.body.on_ground,
            cursor = frame.cursor,
            stagnation = frame.stagnation,
            end = ?frame.end,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simulator {
    pub physics: Physics,
    pub reward: RewardPolicy,
    pub frame_budget: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            reward: RewardPolicy::default(),
            frame_budget: HOPPER_FRAME_BUDGET,
        }
    }
}

impl Simulator {
    pub fn new(physics: Physics, reward: RewardPolicy, frame_budget: usize) -> Self {
        Self {
            physics,
            reward,
            frame_budget,
        }
    }

    pub fn simulate(&self, genotype: &mut Genotype, level: &Level) -> RunOutcome {
        self.simulate_observed(genotype, level, &mut ())
    }

    /// Execute `genotype` from its first instruction until the run ends, then write its
    /// fitness. The cursor is left wherever execution stopped.
    pub fn simulate_observed(
        &self,
        genotype: &mut Genotype,
        level: &Level,
        observer: &mut impl Observer,
    ) -> RunOutcome {
        let physics = &self.physics;
        genotype.reset();

        let spawn = level.spawn_platform();
        let spawn_y = spawn.map_or(
            physics.screen_height - physics.agent_height - HOPPER_AGENT_FALLBACK_LIFT,
            |platform| platform.aabb.top() - physics.agent_height,
        );
        let mut body = Body::new(Aabb::new(
            physics.agent_screen_x,
            spawn_y,
            physics.agent_width,
            physics.agent_height,
        ));
        body.on_ground = spawn.is_some();

        let mut tally = Tally::default();
        let mut held: Option<(Instruction, usize)> = None;
        let mut jumped = false;

        let end = loop {
            if tally.frames >= self.frame_budget {
                break RunEnd::FrameBudget;
            }

            let (instruction, remaining) = match held.filter(|(_, remaining)| *remaining > 0) {
                Some(held) => held,
                None => match genotype.next_instruction() {
                    Some(next) => {
                        jumped = false;
                        (next, next.hold_frames(physics.max_action_frames))
                    }
                    None => break RunEnd::Exhausted,
                },
            };

            if instruction.wants_jump && !jumped && body.jump(physics.jump_impulse) {
                jumped = true;
            }

            let end = self.step(&mut body, &mut tally, level, instruction);
            observer.observe(&Frame {
                index: tally.frames,
                world_x: tally.world_x,
                body,
                instruction,
                cursor: genotype.cursor(),
                stagnation: tally.stagnation,
                end,
            });
            if let Some(end) = end {
                break end;
            }

            tally.frames += 1;
            held = Some((instruction, remaining - 1));
        };

        let fitness = self.reward.score(&tally, end, genotype.remaining());
        genotype.set_fitness(fitness);

        RunOutcome {
            fitness,
            end,
            frames_survived: tally.frames,
            final_cursor: genotype.cursor(),
            world_x: tally.world_x,
            max_world_x: tally.max_world_x,
            leftward: tally.leftward,
        }
    }

    /// Advance one frame of motion under `instruction`, reporting how the run ended if it did
    fn step(
        &self,
        body: &mut Body,
        tally: &mut Tally,
        level: &Level,
        instruction: Instruction,
    ) -> Option<RunEnd> {
        let physics = &self.physics;

        let before = body.aabb;
        body.apply_gravity(physics);
        if physics.fell_off(&body.aabb) {
            return Some(RunEnd::FellOff);
        }

        // walls are tested against the resting box, so standing flush on a floor never counts
        let dx = self.unblocked(
            &before,
            level,
            tally.world_x,
            instruction.x_direction.sign() * physics.move_speed,
        );
        tally.advance(dx, physics.progress_threshold);
        if tally.stagnation > physics.stagnation_limit {
            return Some(RunEnd::Stagnated);
        }

        body.on_ground = false;
        for platform in level.platforms().iter().filter(|p| p.landable()) {
            let view = platform.aabb.translated_x(-tally.world_x);
            if body.resolve(&view, physics.landing_epsilon) == Contact::Landed {
                break;
            }
        }

        level
            .goal()
            .is_some_and(|goal| body.aabb.intersects(&goal.translated_x(-tally.world_x)))
            .then_some(RunEnd::Won)
    }

    /// The part of a horizontal step `dx` that does not carry `aabb` into a wall
    fn unblocked(&self, aabb: &Aabb, level: &Level, world_x: f64, dx: f64) -> f64 {
        if dx == 0. {
            return 0.;
        }

        let enters_wall = level
            .platforms()
            .iter()
            .filter(|p| p.blocks_horizontal())
            .any(|wall| {
                !aabb.intersects(&wall.aabb.translated_x(-world_x))
                    && aabb.intersects(&wall.aabb.translated_x(-(world_x + dx)))
            });

        if enters_wall {
            0.
        } else {
            dx
        }
    }
}

/// Run `genotype` under default physics and reward shaping, stopping after at most
/// `frame_budget` frames
pub fn simulate(genotype: &mut Genotype, level: &Level, frame_budget: usize) -> RunOutcome {
    Simulator {
        frame_budget,
        ..Simulator::default()
    }
    .simulate(genotype, level)
}
