pub mod instruction;
pub use instruction::{Direction, Instruction};

use crate::random::{Happens, MutationEvent, MutationRates, ProbBinding};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// An agent's brain: an ordered script of [Instruction]s, the position of the next one to
/// execute, and the fitness of its last simulated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    instructions: Vec<Instruction>,
    #[serde(skip)]
    cursor: usize,
    #[serde(skip)]
    fitness: Option<f64>,
}

impl Genotype {
    /// A genotype of `length` freshly drawn instructions
    pub fn random(length: usize, rng: &mut impl RngCore) -> Self {
        Self::from_instructions((0..length).map(|_| Instruction::random(rng)).collect())
    }

    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            cursor: 0,
            fitness: None,
        }
    }

    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[inline]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Instructions never consumed by the last run
    #[inline]
    pub fn remaining(&self) -> usize {
        self.instructions.len() - self.cursor
    }

    /// Fitness of the last run, `-inf` while unranked
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    #[inline]
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Rewind execution to the first instruction
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// A copy of this genotype's instructions with fresh run state. Its fitness is unknown
    /// until it is simulated again.
    pub fn offspring(&self) -> Self {
        Self::from_instructions(self.instructions.clone())
    }

    /// Yield the instruction under the cursor and advance past it, or `None` once every
    /// instruction has been consumed
    pub fn next_instruction(&mut self) -> Option<Instruction> {
        let instruction = self.instructions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(instruction)
    }

    /// Perform 0 or more mutations on every instruction. Each one is either replaced outright
    /// or, failing that, possibly jittered in place.
    pub fn mutate(&mut self, rng: &mut (impl RngCore + Happens)) {
        for instruction in self.instructions.iter_mut() {
            if rng.happens(MutationEvent::Replace) {
                *instruction = Instruction::random(rng);
            } else if rng.happens(MutationEvent::Jitter) {
                instruction.jitter(rng);
            }
        }
    }

    pub fn mutate_with(&mut self, mutation_rate: f64, replace_rate: f64, rng: &mut impl RngCore) {
        self.mutate(&mut ProbBinding::new(
            MutationRates::new(mutation_rate, replace_rate),
            rng,
        ));
    }

    /// Append `extra` freshly drawn instructions, leaving existing ones untouched
    pub fn grow(&mut self, extra: usize, rng: &mut impl RngCore) {
        self.instructions.reserve(extra);
        for _ in 0..extra {
            self.instructions.push(Instruction::random(rng));
        }
    }
}
