//! Building the next generation out of a ranked population.

use crate::{
    genome::Genotype,
    population::evaluated_prefix,
    random::{MutationRates, ProbBinding},
};
use rand::{seq::IndexedRandom, RngCore};

/// Knobs for a single breeding pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breeding {
    pub population_size: usize,
    pub genome_length: usize,
    pub elitism_count: usize,
    pub rates: MutationRates,
}

/// Select the genotypes allowed to parent offspring: the fitter half of the evaluated members
/// of `ranked`. Falls back to the elites, then to the single best genotype, so that the pool is
/// only ever empty when nothing has been evaluated.
pub fn parent_pool(ranked: &[Genotype], elitism_count: usize) -> &[Genotype] {
    let evaluated = &ranked[..evaluated_prefix(ranked)];
    let half = ranked.len() / 2;
    if half > 0 && half <= evaluated.len() {
        return &evaluated[..half];
    }

    let elites = elitism_count.min(evaluated.len());
    if elites > 0 {
        &evaluated[..elites]
    } else {
        &evaluated[..evaluated.len().min(1)]
    }
}

/// Produce exactly `breeding.population_size` genotypes from a ranked population. The elites are
/// carried over unmutated, every other slot is a mutated copy of a uniformly chosen parent, and
/// random genotypes fill whatever the parents cannot.
pub fn breed(ranked: &[Genotype], breeding: &Breeding, rng: &mut impl RngCore) -> Vec<Genotype> {
    let size = breeding.population_size;
    let mut pop = Vec::with_capacity(size);

    let evaluated = evaluated_prefix(ranked);
    pop.extend(
        ranked[..breeding.elitism_count.min(evaluated).min(size)]
            .iter()
            .map(Genotype::offspring),
    );

    let pool = parent_pool(ranked, breeding.elitism_count);
    let mut rng = ProbBinding::new(breeding.rates, rng);
    while pop.len() < size {
        let Some(parent) = pool.choose(&mut rng) else {
            break;
        };
        let mut child = parent.offspring();
        child.mutate(&mut rng);
        pop.push(child);
    }

    if pop.len() < size {
        tracing::warn!(
            missing = size - pop.len(),
            "no parents available, padding with random genotypes"
        );
        while pop.len() < size {
            pop.push(Genotype::random(breeding.genome_length, &mut rng));
        }
    }

    pop
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        genome::{Direction, Instruction},
        new_t,
        population::{population_init, rank},
        random::WyRng,
        test_t,
    };
    use rand::{rngs::StdRng, SeedableRng};

    impl Default for Breeding {
        fn default() -> Self {
            Self {
                population_size: 20,
                genome_length: 8,
                elitism_count: 3,
                rates: MutationRates::default(),
            }
        }
    }

    fn ranked(fitness: &[Option<f64>], rng: &mut impl RngCore) -> Vec<Genotype> {
        let mut pop = population_init(fitness.len(), 8, rng);
        for (genotype, fitness) in pop.iter_mut().zip(fitness) {
            if let Some(fitness) = fitness {
                genotype.set_fitness(*fitness);
            }
        }
        rank(&mut pop);
        pop
    }

    test_t!(breed_population_size[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(99);
        let parents = ranked(&[Some(5.), Some(3.), Some(1.), Some(0.), Some(-1.), None], &mut rng);
        for size in [1, 2, 6, 20, 100] {
            let breeding = new_t!(Breeding, population_size = size);
            let next = breed(&parents, &breeding, &mut rng);
            assert_eq!(size, next.len());
            assert!(next.iter().all(|g| !g.is_evaluated() && g.cursor() == 0));
            assert!(next.iter().all(|g| g.len() == 8));
        }
    });

    #[test]
    fn test_elites_survive_unmutated() {
        let mut rng = StdRng::seed_from_u64(4);
        let parents = ranked(&[Some(1.), Some(9.), Some(4.), Some(7.)], &mut rng);
        let breeding = new_t!(
            Breeding,
            population_size = 10,
            elitism_count = 2,
            rates = MutationRates::new(1., 1.),
        );
        let next = breed(&parents, &breeding, &mut rng);
        assert_eq!(parents[0].instructions(), next[0].instructions());
        assert_eq!(parents[1].instructions(), next[1].instructions());
        assert!(next[2..]
            .iter()
            .all(|g| g.instructions() != parents[0].instructions()));
    }

    #[test]
    fn test_pool_is_top_half() {
        let mut rng = StdRng::seed_from_u64(8);
        let parents = ranked(&[Some(1.), Some(2.), Some(3.), Some(4.), None, None], &mut rng);
        let pool = parent_pool(&parents, 1);
        assert_eq!(
            vec![4., 3., 2.],
            pool.iter().map(Genotype::fitness).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_pool_falls_back() {
        let mut rng = StdRng::seed_from_u64(8);

        // too few evaluated for half, fall back to elites
        let parents = ranked(&[Some(1.), Some(2.), None, None, None, None], &mut rng);
        assert_eq!(2, parent_pool(&parents, 5).len());

        // no elitism, fall back to the best
        let pool = parent_pool(&parents, 0);
        assert_eq!(vec![2.], pool.iter().map(Genotype::fitness).collect::<Vec<_>>());

        // a lone genotype parents everything
        let parents = ranked(&[Some(1.)], &mut rng);
        assert_eq!(1, parent_pool(&parents, 0).len());

        let parents = ranked(&[None, None], &mut rng);
        assert!(parent_pool(&parents, 2).is_empty());
    }

    #[test]
    fn test_breed_without_parents_pads_randomly() {
        let mut rng = StdRng::seed_from_u64(21);
        let parents = ranked(&[None, None, None], &mut rng);
        let breeding = new_t!(Breeding, population_size = 7, genome_length = 11);
        let next = breed(&parents, &breeding, &mut rng);
        assert_eq!(7, next.len());
        assert!(next.iter().all(|g| g.len() == 11));
    }

    #[test]
    fn test_zero_rates_clone_parents() {
        let mut rng = StdRng::seed_from_u64(13);
        let script = vec![Instruction::new(true, 0.4, Direction::Right); 5];
        let mut parent = Genotype::from_instructions(script.clone());
        parent.set_fitness(1.);
        let breeding = new_t!(
            Breeding,
            population_size = 6,
            elitism_count = 0,
            rates = MutationRates::new(0., 0.),
        );
        let next = breed(&[parent], &breeding, &mut rng);
        assert!(next.iter().all(|g| g.instructions() == script.as_slice()));
    }
}
