//! Functions for creating, evaluating and ranking a whole population of [Genotype]s.

use crate::{
    genome::{Genotype, Instruction},
    level::Level,
    simulate::{RunOutcome, Simulator},
};
use core::cmp::Ordering;
use rand::RngCore;

/// `population` genotypes of `length` freshly drawn instructions each
pub fn population_init(population: usize, length: usize, rng: &mut impl RngCore) -> Vec<Genotype> {
    (0..population)
        .map(|_| Genotype::random(length, rng))
        .collect()
}

/// Seed a population from a single saved script. The first member is the script itself, the
/// rest are mutated copies of it.
pub fn population_from_instructions(
    instructions: Vec<Instruction>,
    population: usize,
    mutation_rate: f64,
    replace_rate: f64,
    rng: &mut impl RngCore,
) -> Vec<Genotype> {
    let muse = Genotype::from_instructions(instructions);
    let mut pop = Vec::with_capacity(population);
    for idx in 0..population {
        let mut member = muse.offspring();
        if idx != 0 {
            member.mutate_with(mutation_rate, replace_rate, rng);
        }
        pop.push(member);
    }
    pop
}

/// What one evaluation pass over a population found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluated {
    /// how many genotypes were simulated before the pass ended
    pub simulated: usize,
    /// index of the first winning genotype, if any
    pub winner: Option<usize>,
}

fn report(idx: usize, outcome: &RunOutcome) {
    tracing::debug!(
        genotype = idx,
        fitness = outcome.fitness,
        end = ?outcome.end,
        frames = outcome.frames_survived,
        cursor = outcome.final_cursor,
    );
}

/// Simulate every genotype in `population`, in order. With `stop_on_win` the pass ends at the
/// first winner, leaving every later genotype unevaluated.
#[cfg(not(feature = "parallel"))]
pub fn evaluate(
    population: &mut [Genotype],
    level: &Level,
    simulator: &Simulator,
    stop_on_win: bool,
) -> Evaluated {
    let mut simulated = 0;
    let mut winner = None;
    for (idx, genotype) in population.iter_mut().enumerate() {
        let outcome = simulator.simulate(genotype, level);
        report(idx, &outcome);
        simulated += 1;
        if outcome.won() && winner.is_none() {
            winner = Some(idx);
            if stop_on_win {
                break;
            }
        }
    }
    Evaluated { simulated, winner }
}

/// Simulate every genotype in `population` across the rayon pool. Runs are independent, so
/// every genotype is evaluated regardless of `stop_on_win`.
#[cfg(feature = "parallel")]
pub fn evaluate(
    population: &mut [Genotype],
    level: &Level,
    simulator: &Simulator,
    _stop_on_win: bool,
) -> Evaluated {
    use rayon::prelude::*;

    let outcomes = population
        .par_iter_mut()
        .map(|genotype| simulator.simulate(genotype, level))
        .collect::<Vec<_>>();

    for (idx, outcome) in outcomes.iter().enumerate() {
        report(idx, outcome);
    }

    Evaluated {
        simulated: outcomes.len(),
        winner: outcomes.iter().position(RunOutcome::won),
    }
}

fn by_fitness(l: &Genotype, r: &Genotype) -> Ordering {
    match (l.is_evaluated(), r.is_evaluated()) {
        (true, true) => r.fitness().total_cmp(&l.fitness()),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Sort `population` best first. Evaluated genotypes come before unevaluated ones, and ties
/// keep their evaluation order.
pub fn rank(population: &mut [Genotype]) {
    population.sort_by(by_fitness);
}

/// How many leading members of a ranked population have a known fitness
pub fn evaluated_prefix(ranked: &[Genotype]) -> usize {
    ranked.partition_point(Genotype::is_evaluated)
}

/// The fittest evaluated genotype
pub fn champion(population: &[Genotype]) -> Option<&Genotype> {
    population
        .iter()
        .filter(|g| g.is_evaluated())
        .min_by(|l, r| by_fitness(l, r))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        genome::Direction,
        geometry::Aabb,
        random::WyRng,
        test_t,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn scored(fitness: Option<f64>) -> Genotype {
        let mut genotype = Genotype::from_instructions(vec![Instruction::new(
            false,
            0.5,
            Direction::Stay,
        )]);
        if let Some(fitness) = fitness {
            genotype.set_fitness(fitness);
        }
        genotype
    }

    test_t!(population_init[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(9);
        for (population, length) in [(0, 5), (1, 1), (40, 80)] {
            let pop = population_init(population, length, &mut rng);
            assert_eq!(population, pop.len());
            for genotype in pop.iter() {
                assert_eq!(length, genotype.len());
                assert_eq!(0, genotype.cursor());
                assert!(!genotype.is_evaluated());
                assert!(genotype.instructions().iter().all(Instruction::is_valid));
            }
        }
    });

    #[test]
    fn test_population_from_instructions() {
        let mut rng = StdRng::seed_from_u64(2);
        let muse = Genotype::random(30, &mut rng).into_instructions();
        let pop = population_from_instructions(muse.clone(), 12, 0.5, 0.5, &mut rng);
        assert_eq!(12, pop.len());
        assert_eq!(muse.as_slice(), pop[0].instructions());
        assert!(pop.iter().all(|g| g.len() == muse.len()));
        assert!(pop[1..].iter().any(|g| g.instructions() != muse.as_slice()));
    }

    #[test]
    fn test_rank_orders_evaluated_first() {
        let mut pop = vec![
            scored(Some(-5.)),
            scored(None),
            scored(Some(10.)),
            scored(Some(-300_000.)),
            scored(None),
            scored(Some(10.)),
        ];
        pop[2].grow(1, &mut StdRng::seed_from_u64(0));
        rank(&mut pop);

        let fitness = pop.iter().map(Genotype::fitness).collect::<Vec<_>>();
        assert_eq!(
            vec![10., 10., -5., -300_000., f64::NEG_INFINITY, f64::NEG_INFINITY],
            fitness
        );
        // stable among equals
        assert_eq!(2, pop[0].len());
        assert_eq!(1, pop[1].len());
        assert_eq!(4, evaluated_prefix(&pop));
        assert_eq!(Some(&pop[0]), champion(&pop));
    }

    #[test]
    fn test_champion_ignores_unevaluated() {
        assert_eq!(None, champion(&[scored(None), scored(None)]));
        let pop = [scored(None), scored(Some(-1.)), scored(Some(3.))];
        assert_eq!(Some(3.), champion(&pop).map(Genotype::fitness));
    }

    #[test]
    fn test_evaluate_scores_everyone() {
        let mut rng = StdRng::seed_from_u64(31);
        let level = Level::generate(vec![Aabb::new(600., 450., 200., 30.)], 600.);
        let mut pop = population_init(16, 10, &mut rng);
        let evaluated = evaluate(&mut pop, &level, &Simulator::default(), false);
        assert_eq!(16, evaluated.simulated);
        assert!(pop.iter().all(Genotype::is_evaluated));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_evaluate_stops_on_win() {
        let level = Level::generate(vec![Aabb::new(205., 550., 200., 30.)], 600.);
        let walker = || {
            Genotype::from_instructions(vec![Instruction::new(false, 1., Direction::Right); 4])
        };
        let mut pop = vec![scored(None), walker(), walker(), scored(None)];
        let evaluated = evaluate(&mut pop, &level, &Simulator::default(), true);
        assert_eq!(Some(1), evaluated.winner);
        assert_eq!(2, evaluated.simulated);
        assert!(pop[1].is_evaluated());
        assert!(!pop[2].is_evaluated());
        assert!(!pop[3].is_evaluated());
    }
}
