use std::{io, path::PathBuf};
use thiserror::Error;

/// A settings value that makes evolution meaningless or unsafe to start
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    ZeroPopulation,
    #[error("genome_length must be at least 1")]
    ZeroGenomeLength,
    #[error("max_generations must be at least 1")]
    ZeroGenerations,
    #[error("frame_budget must be at least 1")]
    ZeroFrameBudget,
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("elitism_count ({elitism}) exceeds population_size ({population})")]
    ElitismExceedsPopulation { elitism: usize, population: usize },
    #[error("fall_off_penalty must be negative, got {penalty}")]
    NonNegativeFallPenalty { penalty: f64 },
    #[error(
        "win_fitness_threshold {threshold} must lie above the best non-winning fitness \
         ({ceiling}) and at or below the worst winning fitness ({floor})"
    )]
    ThresholdNotSeparating { threshold: f64, ceiling: f64, floor: f64 },
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a saved genome could not be restored
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read saved genome: {0}")]
    Io(#[from] io::Error),
    #[error("saved genome is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("saved genome has no instructions")]
    Empty,
    #[error("instruction {index} has hold fraction {hold_fraction} outside of its range")]
    OutOfRange { index: usize, hold_fraction: f64 },
}

/// Why a genome could not be saved
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write saved genome: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode genome: {0}")]
    Encode(#[from] serde_json::Error),
}
