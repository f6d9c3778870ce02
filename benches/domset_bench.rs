//! Criterion benchmarks for u-domset.
//!
//! Measures fitness evaluation and full engine runs on grid and random
//! graphs of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_domset::ga::{EngineConfig, EvolutionEngine, FitnessEvaluator, Individual};
use u_domset::graph::GraphGenerator;
use u_domset::random::create_rng;

// ===========================================================================
// Fitness evaluation
// ===========================================================================

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_evaluate");
    for &side in &[5, 10, 20] {
        let graph = GraphGenerator::grid(side, side).unwrap();
        let evaluator = FitnessEvaluator::new(&graph);
        let mut rng = create_rng(42);
        let individuals: Vec<Individual> = (0..100)
            .map(|_| Individual::random(graph.num_vertices(), &mut rng))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(side * side),
            &individuals,
            |b, inds| {
                b.iter(|| {
                    for ind in inds {
                        black_box(evaluator.score(black_box(ind.genes())).unwrap());
                    }
                })
            },
        );
    }
    group.finish();
}

// ===========================================================================
// Engine runs
// ===========================================================================

fn bench_engine_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_grid");
    group.sample_size(10);

    for &side in &[5, 8, 12] {
        let graph = GraphGenerator::grid(side, side).unwrap();
        let config = EngineConfig::default().with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(side * side),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut engine = EvolutionEngine::new(&graph, config.clone()).unwrap();
                    black_box(engine.run().unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_engine_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_random");
    group.sample_size(10);

    for &(n, m) in &[(30, 60), (100, 300), (300, 1200)] {
        let graph = GraphGenerator::seeded(7).random(n, m).unwrap();
        let config = EngineConfig::default().with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &config, |b, config| {
            b.iter(|| {
                let mut engine = EvolutionEngine::new(&graph, config.clone()).unwrap();
                black_box(engine.run().unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitness, bench_engine_grid, bench_engine_random);
criterion_main!(benches);
