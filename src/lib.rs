pub mod config;
pub mod constants;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod level;
pub mod macros;
pub mod physics;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod scenario;
pub mod serialize;
pub mod simulate;

pub use config::EvolutionConfig;
pub use genome::{Direction, Genotype, Instruction};
pub use geometry::Aabb;
pub use level::{Level, Platform, PlatformKind};
pub use random::{Happens, Probabilities};
pub use scenario::{Evolution, Phase, Stats, Termination};
pub use simulate::{simulate, Observer, RunEnd, RunOutcome, Simulator};
