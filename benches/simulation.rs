//! Benchmarks for Picobot simulation and fitness evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use picobot::{
    FitnessEvaluator, Program, World,
    schema::{EvaluationConfig, WorldConfig},
};

fn bench_world_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_run");

    for size in [10, 25, 50, 100] {
        let config = WorldConfig {
            width: size,
            height: size,
            num_states: 5,
        };
        let program = Program::random(config.num_states, &mut StdRng::seed_from_u64(42));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    let mut world = World::new(&config, 1, 1).unwrap();
                    world.run(black_box(&program), 1000);
                    world.coverage()
                });
            },
        );
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for trials in [1, 10, 50] {
        let evaluator = FitnessEvaluator::new(
            WorldConfig::default(),
            EvaluationConfig {
                trials,
                steps: 1000,
            },
        )
        .unwrap();
        let program = Program::random(5, &mut StdRng::seed_from_u64(42));
        let mut rng = StdRng::seed_from_u64(7);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_trials", trials)),
            &trials,
            |b, _| {
                b.iter(|| evaluator.evaluate(black_box(&program), &mut rng));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_world_run, bench_evaluate);
criterion_main!(benches);
