use criterion::Criterion;
use hopper::{
    constants::HOPPER_RANDOM_DIRECTION,
    genome::{Genotype, Instruction},
    random::default_rng,
};
use rand::RngCore;

fn bench_next(bench: &mut Criterion) {
    let mut rng = default_rng();

    bench.bench_function("random-next", |b| {
        b.iter(|| rng.next_u64());
    });
}

fn bench_direction(bench: &mut Criterion) {
    let mut rng = default_rng();

    bench.bench_function("random-direction", |b| {
        b.iter(|| HOPPER_RANDOM_DIRECTION.pick(&mut rng));
    });
}

fn bench_instruction(bench: &mut Criterion) {
    let mut rng = default_rng();

    bench.bench_function("random-instruction", |b| {
        b.iter(|| Instruction::random(&mut rng));
    });
}

fn bench_genotype(bench: &mut Criterion) {
    let mut rng = default_rng();

    bench.bench_function("random-genotype", |b| {
        b.iter(|| Genotype::random(48, &mut rng));
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(500)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_next(&mut criterion);
    bench_direction(&mut criterion);
    bench_instruction(&mut criterion);
    bench_genotype(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
