//! Evolve an instruction script that clears a level, or replay one saved earlier.
//!
//! Usage:
//!   hopper --level levels/level.txt
//!   RUST_LOG=hopper=debug hopper --level levels/level.txt --retrain --seed 7

use clap::Parser;
use hopper::{
    config::EvolutionConfig,
    genome::Genotype,
    random::stream_rng,
    scenario::{Evolution, Termination},
    serialize::{load_saved_or_none, save},
    simulate::{FrameLog, RunOutcome, Simulator},
    Level,
};
use std::{error::Error, path::PathBuf, process::exit};

#[derive(Parser, Debug)]
#[command(name = "hopper")]
#[command(about = "Evolve instruction scripts that clear side-scrolling platform levels")]
struct Args {
    /// Level file, one `x,y,width` platform per line
    #[arg(short, long, default_value = "levels/level.txt")]
    level: PathBuf,

    /// JSON settings; anything left out keeps its default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the winning script is stored and replayed from
    #[arg(short, long, default_value = "best_genome.json")]
    saved: PathBuf,

    /// Seed for every random decision, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Evolve from scratch even if a saved script exists
    #[arg(long)]
    retrain: bool,
}

fn report(label: &str, outcome: &RunOutcome) {
    println!(
        "{label}: fitness {:.2}, {:?} after {} frames, {} instructions used",
        outcome.fitness, outcome.end, outcome.frames_survived, outcome.final_cursor
    );
}

fn demonstrate(simulator: &Simulator, genotype: &mut Genotype, level: &Level) -> RunOutcome {
    simulator.simulate_observed(genotype, level, &mut FrameLog)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EvolutionConfig::from_file(path),
        None => Ok(EvolutionConfig::default()),
    }
    .and_then(|config| config.validate().map(|()| config));
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            exit(1);
        }
    };

    let level = Level::load(&args.level, config.physics.screen_height);
    let simulator = config.simulator();

    if !args.retrain {
        if let Some(script) = load_saved_or_none(&args.saved) {
            let mut genotype = Genotype::from_instructions(script);
            let outcome = demonstrate(&simulator, &mut genotype, &level);
            report("saved script", &outcome);
            return Ok(());
        }
    }

    let rng = stream_rng(args.seed, 0);
    let mut evolution = Evolution::seeded(config, level, rng)?;
    let termination = evolution.run();
    println!(
        "{termination:?} after {} generations",
        evolution.history().len()
    );

    let Some(champion) = evolution.champion() else {
        return Ok(());
    };
    let mut champion = champion.offspring();

    if termination == Termination::WinFound {
        save(&args.saved, champion.instructions())?;
        println!("winning script saved to {}", args.saved.display());
    }

    let config = evolution.config();
    let extra = config.demo_length().saturating_sub(champion.len());
    champion.grow(extra, &mut stream_rng(args.seed, 1));
    let outcome = demonstrate(evolution.simulator(), &mut champion, evolution.level());
    report("champion", &outcome);

    Ok(())
}
