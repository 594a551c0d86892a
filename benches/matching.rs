//! Benchmarks for the stable matching engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- run_to_completion
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use stable_matching::engine::{advance_step, run_to_completion, EngineState};
use stable_matching::types::{PreferenceModel, PreferenceSource, RandomPreferences};

/// Problem sizes (pairs per side)
const SIZES: [usize; 4] = [10, 100, 500, 1_000];

fn model_for(n: usize) -> PreferenceModel {
    RandomPreferences::seeded(42).model(n).expect("generated matrix is valid")
}

// ============================================================================
// BENCHMARK: Model Construction
// ============================================================================

fn bench_model_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_construction");
    group.measurement_time(Duration::from_secs(5));

    for &n in &SIZES {
        let matrix = RandomPreferences::seeded(42).matrix(n);
        group.throughput(Throughput::Elements((2 * n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &matrix, |b, matrix| {
            b.iter(|| PreferenceModel::from_matrix(black_box(matrix)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Batch Run
// ============================================================================

fn bench_run_to_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_to_completion");
    group.measurement_time(Duration::from_secs(5));

    for &n in &SIZES {
        let model = model_for(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| run_to_completion(black_box(model)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Stepwise Replay (one call per proposal)
// ============================================================================

fn bench_stepwise_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("stepwise_replay");
    group.measurement_time(Duration::from_secs(5));

    for &n in &SIZES[..3] {
        let model = model_for(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter_batched(
                || EngineState::new(model.n()),
                |mut state| {
                    let mut target = 0;
                    loop {
                        target += 1;
                        let (next, snapshot) = advance_step(model, state, target, 0).unwrap();
                        state = next;
                        if snapshot.done {
                            break state;
                        }
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_model_construction,
    bench_run_to_completion,
    bench_stepwise_replay
);
criterion_main!(benches);
