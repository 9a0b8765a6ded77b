//! Run settings for the evolution engine, loadable from a JSON file.

use crate::{
    constants::*,
    error::ConfigError,
    physics::Physics,
    random::MutationRates,
    reproduce::Breeding,
    simulate::{RewardPolicy, Simulator},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub mutation_rate: f64,
    pub replace_rate: f64,
    pub elitism_count: usize,
    pub max_generations: usize,
    pub win_fitness_threshold: f64,
    /// hard ceiling on frames per run, on top of instruction exhaustion
    pub frame_budget: usize,
    /// end an evaluation pass at its first winner
    pub stop_on_win: bool,
    /// length of the final demonstration script, as a multiple of `genome_length`
    pub demo_growth: f64,
    pub physics: Physics,
    pub reward: RewardPolicy,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: HOPPER_POPULATION_SIZE,
            genome_length: HOPPER_GENOME_LENGTH,
            mutation_rate: HOPPER_MUTATION_RATE,
            replace_rate: HOPPER_REPLACE_RATE,
            elitism_count: HOPPER_ELITISM_COUNT,
            max_generations: HOPPER_MAX_GENERATIONS,
            win_fitness_threshold: HOPPER_WIN_FITNESS_THRESHOLD,
            frame_budget: HOPPER_FRAME_BUDGET,
            stop_on_win: true,
            demo_growth: HOPPER_DEMO_GROWTH,
            physics: Physics::default(),
            reward: RewardPolicy::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&src).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject settings under which evolution cannot run, or under which the win threshold does
    /// not cleanly separate winning runs from everything else
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.genome_length == 0 {
            return Err(ConfigError::ZeroGenomeLength);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.frame_budget == 0 {
            return Err(ConfigError::ZeroFrameBudget);
        }

        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("replace_rate", self.replace_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        if self.elitism_count > self.population_size {
            return Err(ConfigError::ElitismExceedsPopulation {
                elitism: self.elitism_count,
                population: self.population_size,
            });
        }

        if self.reward.fall_off_penalty >= 0. {
            return Err(ConfigError::NonNegativeFallPenalty {
                penalty: self.reward.fall_off_penalty,
            });
        }

        let ceiling = self
            .reward
            .non_winning_ceiling(&self.physics, self.frame_budget);
        let floor = self.reward.winning_floor(&self.physics, self.frame_budget);
        if !(ceiling < self.win_fitness_threshold && self.win_fitness_threshold <= floor) {
            return Err(ConfigError::ThresholdNotSeparating {
                threshold: self.win_fitness_threshold,
                ceiling,
                floor,
            });
        }

        Ok(())
    }

    pub fn mutation_rates(&self) -> MutationRates {
        MutationRates::new(self.mutation_rate, self.replace_rate)
    }

    pub fn breeding(&self) -> Breeding {
        Breeding {
            population_size: self.population_size,
            genome_length: self.genome_length,
            elitism_count: self.elitism_count,
            rates: self.mutation_rates(),
        }
    }

    pub fn simulator(&self) -> Simulator {
        Simulator::new(self.physics, self.reward, self.frame_budget)
    }

    /// Number of instructions in the final demonstration script
    pub fn demo_length(&self) -> usize {
        (self.genome_length as f64 * self.demo_growth).round() as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::new_t;

    #[test]
    fn test_defaults_validate() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(96, config.demo_length());
        assert_eq!(config.population_size, config.breeding().population_size);
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        let config = new_t!(EvolutionConfig, population_size = 0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPopulation)));

        let config = new_t!(EvolutionConfig, genome_length = 0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroGenomeLength)));

        let config = new_t!(EvolutionConfig, max_generations = 0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroGenerations)));

        let config = new_t!(EvolutionConfig, frame_budget = 0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFrameBudget)));

        let config = new_t!(EvolutionConfig, population_size = 4, elitism_count = 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ElitismExceedsPopulation {
                elitism: 5,
                population: 4
            })
        ));
    }

    #[test]
    fn test_rejects_rates() {
        for (mutation_rate, replace_rate) in [(-0.1, 0.1), (0.2, 1.5), (f64::NAN, 0.)] {
            let config = new_t!(
                EvolutionConfig,
                mutation_rate = mutation_rate,
                replace_rate = replace_rate,
            );
            assert!(matches!(
                config.validate(),
                Err(ConfigError::RateOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_threshold_overlap() {
        // reachable without winning
        let config = new_t!(EvolutionConfig, win_fitness_threshold = 100_000.);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdNotSeparating { .. })
        ));

        // unreachable by some winners
        let config = new_t!(EvolutionConfig, win_fitness_threshold = 1_900_000.);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdNotSeparating { .. })
        ));

        // a long frame budget lets non-winners climb past the threshold
        let config = new_t!(EvolutionConfig, frame_budget = 1_000_000);
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.reward.fall_off_penalty = 0.;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonNegativeFallPenalty { .. })
        ));
    }

    #[test]
    fn test_partial_json() {
        let config: EvolutionConfig = serde_json::from_str(
            r#"{"population_size": 12, "physics": {"gravity": 1.0}, "reward": {"win_bonus": 3000000.0}}"#,
        )
        .unwrap();
        assert_eq!(12, config.population_size);
        assert_eq!(HOPPER_GENOME_LENGTH, config.genome_length);
        assert_eq!(1.0, config.physics.gravity);
        assert_eq!(HOPPER_JUMP_IMPULSE, config.physics.jump_impulse);
        assert_eq!(3_000_000., config.reward.win_bonus);
        assert_eq!(HOPPER_FALL_OFF_PENALTY, config.reward.fall_off_penalty);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = std::env::temp_dir().join("hopper-config-that-does-not-exist.json");
        assert!(matches!(
            EvolutionConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let path = std::env::temp_dir().join(format!("hopper-config-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let parsed = EvolutionConfig::from_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(parsed, Err(ConfigError::Parse { .. })));
    }
}
