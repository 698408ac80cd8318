//! Criterion benchmarks for u-nichepso.
//!
//! Uses synthetic fronts and a synthetic separable dataset held in a
//! `MemoryStore`, so the numbers measure optimizer overhead rather than
//! store latency.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_nichepso::dataset::{AttributeKind, Dataset, MemoryStore};
use u_nichepso::fitness::Objectives;
use u_nichepso::pareto::{crowding_distances, Archive, Truncation};
use u_nichepso::pso::{NichedSwarm, SwarmConfig};
use u_nichepso::rule::{Comparator, Condition, Rule};

// ===========================================================================
// Fixtures
// ===========================================================================

/// Rules on the trade-off line `effectiveness + accuracy = 1`, jittered.
fn trade_off_rules(n: usize, rng: &mut StdRng) -> Vec<Rule> {
    (0..n)
        .map(|i| {
            let a: f64 = rng.random_range(0.0..1.0);
            Rule::new(0, vec![Condition::value("x", Comparator::Gt, i as f64)])
                .map(|r| r.with_objectives(Objectives::new(1.0, 1.0 - a, a)))
                .unwrap()
        })
        .collect()
}

/// Two classes over four attributes; `x0` separates them.
fn separable_store(records: u64) -> MemoryStore {
    let mut store = MemoryStore::new(vec![
        ("x0", AttributeKind::Numeric),
        ("x1", AttributeKind::Numeric),
        ("x2", AttributeKind::Numeric),
        ("x3", AttributeKind::Numeric),
    ]);
    let mut rng = StdRng::seed_from_u64(0);
    for id in 0..records {
        let positive = id % 2 == 0;
        let x0 = if positive {
            rng.random_range(0.0..4.0)
        } else {
            rng.random_range(6.0..10.0)
        };
        let row = vec![
            x0,
            rng.random_range(0.0..10.0),
            rng.random_range(0.0..10.0),
            rng.random_range(0.0..10.0),
        ];
        store
            .insert(id, if positive { "pos" } else { "neg" }, row)
            .unwrap();
    }
    store
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_archive_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_insert");
    group.sample_size(20);

    for n in [50usize, 200, 1000] {
        let mut rng = StdRng::seed_from_u64(42);
        let rules = trade_off_rules(n, &mut rng);
        for truncation in [Truncation::Random, Truncation::Crowding] {
            group.bench_with_input(
                BenchmarkId::new(format!("{truncation:?}"), n),
                &rules,
                |b, rules| {
                    b.iter(|| {
                        let mut rng = StdRng::seed_from_u64(1);
                        let mut archive = Archive::new(30);
                        for rule in rules {
                            archive.insert(black_box(rule), truncation, &mut rng);
                        }
                        black_box(archive.len())
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_crowding(c: &mut Criterion) {
    let mut group = c.benchmark_group("crowding");

    for n in [30usize, 300] {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Objectives> = trade_off_rules(n, &mut rng)
            .iter()
            .map(|r| *r.objectives())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| black_box(crowding_distances(black_box(points))))
        });
    }
    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm_fold");
    group.sample_size(10);

    for (records, budget) in [(200u64, 500usize), (1000, 500), (1000, 2000)] {
        let store = separable_store(records);
        let dataset = Dataset::load(&store).unwrap();
        let fold: Vec<u64> = (0..records).step_by(10).collect();
        let config = SwarmConfig::default()
            .with_swarm_size(20)
            .with_max_iterations(budget);

        group.bench_with_input(
            BenchmarkId::new(format!("r{records}_b{budget}"), records),
            &(store, dataset, fold, config),
            |b, (store, dataset, fold, config)| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    let report = NichedSwarm::new(store, dataset, config, 0, fold, &mut rng)
                        .and_then(|swarm| swarm.run(&mut rng))
                        .unwrap();
                    black_box(report)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_archive_insert, bench_crowding, bench_fold);
criterion_main!(benches);
