//! The generational loop, driven as an explicit state machine.

use crate::{
    config::EvolutionConfig,
    error::ConfigError,
    genome::{Genotype, Instruction},
    level::Level,
    population::{champion, evaluate, population_from_instructions, population_init, rank},
    random::{default_rng, WyRng},
    reproduce::breed,
    simulate::Simulator,
};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    WinFound,
    GenerationLimitReached,
}

/// Where the engine stands. Generation numbers count from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initializing,
    Evaluating(usize),
    Selecting(usize),
    Breeding(usize),
    Terminated(Termination),
}

/// Summary of one evaluated generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub generation: usize,
    pub best: f64,
    /// mean over evaluated genotypes only
    pub mean: f64,
    pub evaluated: usize,
}

impl Stats {
    fn collect(generation: usize, population: &[Genotype]) -> Self {
        let (evaluated, total, best) = population
            .iter()
            .filter(|g| g.is_evaluated())
            .fold((0, 0., f64::NEG_INFINITY), |(n, total, best), g| {
                (n + 1, total + g.fitness(), g.fitness().max(best))
            });

        Self {
            generation,
            best,
            mean: if evaluated == 0 {
                f64::NEG_INFINITY
            } else {
                total / evaluated as f64
            },
            evaluated,
        }
    }
}

pub struct Evolution<R: RngCore> {
    config: EvolutionConfig,
    simulator: Simulator,
    level: Level,
    population: Vec<Genotype>,
    phase: Phase,
    history: Vec<Stats>,
    rng: R,
}

impl Evolution<WyRng> {
    /// An engine seeded from the system's entropy source
    pub fn new(config: EvolutionConfig, level: Level) -> Result<Self, ConfigError> {
        Self::seeded(config, level, default_rng())
    }
}

impl<R: RngCore> Evolution<R> {
    /// Validate `config` and build an engine that draws every random decision from `rng`
    pub fn seeded(config: EvolutionConfig, level: Level, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            simulator: config.simulator(),
            config,
            level,
            population: Vec::new(),
            phase: Phase::Initializing,
            history: Vec::new(),
            rng,
        })
    }

    /// Start from mutated copies of a known script instead of a random population. Has no
    /// effect once the engine has left [Phase::Initializing].
    pub fn resume_from(&mut self, instructions: Vec<Instruction>) {
        if self.phase != Phase::Initializing || instructions.is_empty() {
            return;
        }
        self.population = population_from_instructions(
            instructions,
            self.config.population_size,
            self.config.mutation_rate,
            self.config.replace_rate,
            &mut self.rng,
        );
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn population(&self) -> &[Genotype] {
        &self.population
    }

    #[inline]
    pub fn history(&self) -> &[Stats] {
        &self.history
    }

    #[inline]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// The best evaluated genotype seen in the current population
    pub fn champion(&self) -> Option<&Genotype> {
        champion(&self.population)
    }

    /// Advance by exactly one phase transition and return the new phase
    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Initializing => {
                if self.population.is_empty() {
                    self.population = population_init(
                        self.config.population_size,
                        self.config.genome_length,
                        &mut self.rng,
                    );
                }
                tracing::info!(
                    population = self.population.len(),
                    genome_length = self.config.genome_length,
                    "population initialized"
                );
                Phase::Evaluating(0)
            }
            Phase::Evaluating(generation) => {
                let evaluated = evaluate(
                    &mut self.population,
                    &self.level,
                    &self.simulator,
                    self.config.stop_on_win,
                );
                rank(&mut self.population);

                let stats = Stats::collect(generation, &self.population);
                tracing::info!(
                    generation,
                    best = stats.best,
                    mean = stats.mean,
                    evaluated = stats.evaluated,
                    winner = ?evaluated.winner,
                );
                self.history.push(stats);

                if stats.best >= self.config.win_fitness_threshold {
                    self.terminate(Termination::WinFound)
                } else {
                    Phase::Selecting(generation)
                }
            }
            Phase::Selecting(generation) => {
                if generation + 1 >= self.config.max_generations {
                    self.terminate(Termination::GenerationLimitReached)
                } else {
                    Phase::Breeding(generation)
                }
            }
            Phase::Breeding(generation) => {
                self.population = breed(&self.population, &self.config.breeding(), &mut self.rng);
                Phase::Evaluating(generation + 1)
            }
            terminated @ Phase::Terminated(_) => terminated,
        };
        self.phase
    }

    /// Step until the engine terminates
    pub fn run(&mut self) -> Termination {
        loop {
            if let Phase::Terminated(reason) = self.step() {
                break reason;
            }
        }
    }

    fn terminate(&self, reason: Termination) -> Phase {
        tracing::info!(
            ?reason,
            generations = self.history.len(),
            champion = ?self.champion().map(Genotype::fitness),
            "evolution finished"
        );
        Phase::Terminated(reason)
    }
}
