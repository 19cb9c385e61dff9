//! Criterion benchmarks for the closure engine and instruction builder.
//!
//! - Closure build on the unit square, all axioms, ranks 1-3.
//! - Point/line matching against a finished rank-3 closure.
//! - Instruction building (plus coalescing) for random rank-3 targets.
//!
//! Results: by default under target/criterion.

use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use foldref::api::*;
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn config(max_rank: usize) -> FinderConfig {
    FinderConfig {
        max_rank,
        ..FinderConfig::default()
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure_build");
    group.sample_size(10);
    for &rank in &[1usize, 2, 3] {
        let cfg = config(rank);
        group.bench_with_input(BenchmarkId::from_parameter(rank), &cfg, |b, cfg| {
            b.iter(|| {
                let stop = AtomicBool::new(false);
                black_box(Closure::build(cfg, &stop).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure_match");
    let mut closure = Closure::build(&config(3), &AtomicBool::new(false)).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    group.bench_function("points", |b| {
        b.iter_batched(
            || Vector2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
            |p| black_box(closure.match_points(p)),
            BatchSize::SmallInput,
        )
    });
    let mut rng = StdRng::seed_from_u64(43);
    group.bench_function("lines", |b| {
        b.iter_batched(
            || {
                let p = Vector2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                let q = Vector2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                Line::through(p, q).unwrap_or_else(|| Line::from_unit(Vector2::x(), 0.5))
            },
            |line| black_box(closure.match_lines(&line)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_instructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("instructions");
    let mut closure = Closure::build(&config(3), &AtomicBool::new(false)).unwrap();
    let targets: Vec<RefId> = {
        let store = closure.store();
        store
            .point_ids()
            .filter(|&id| store.point(id).rank == 3)
            .step_by(7)
            .take(64)
            .map(RefId::from)
            .collect()
    };
    let mut i = 0usize;
    group.bench_function("build_and_coalesce", |b| {
        b.iter(|| {
            let store = closure.store_mut();
            store.clear_labels();
            let target = targets[i % targets.len()];
            i += 1;
            let mut steps = build_instructions(store, target, &[]);
            coalesce(store, &mut steps);
            black_box(steps.len())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_match, bench_instructions);
criterion_main!(benches);
