//! Trajectory pass benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use videostab_rs::{cumulative_trajectory, smooth_trajectory, MotionSample, StabilizationPlan};

/// Jittery pan: steady rightward motion with alternating vertical noise.
fn synthetic_samples(n: usize) -> Vec<MotionSample> {
    (0..n)
        .map(|i| {
            let jitter = if i % 2 == 0 { 4 } else { -4 };
            MotionSample::new(3, jitter, (i % 11 == 0) as i64)
        })
        .collect()
}

fn benchmark_cumulative_trajectory(c: &mut Criterion) {
    let samples = synthetic_samples(10_000);

    c.bench_function("cumulative_trajectory_10k", |b| {
        b.iter(|| cumulative_trajectory(black_box(&samples)))
    });
}

fn benchmark_smooth_trajectory(c: &mut Criterion) {
    let trajectory = cumulative_trajectory(&synthetic_samples(10_000));

    c.bench_function("smooth_trajectory_10k_r7", |b| {
        b.iter(|| smooth_trajectory(black_box(&trajectory), 7))
    });

    c.bench_function("smooth_trajectory_10k_r30", |b| {
        b.iter(|| smooth_trajectory(black_box(&trajectory), 30))
    });
}

fn benchmark_full_plan(c: &mut Criterion) {
    let samples = synthetic_samples(10_000);

    c.bench_function("stabilization_plan_10k", |b| {
        b.iter(|| StabilizationPlan::from_samples(black_box(samples.clone()), 7))
    });
}

criterion_group!(
    benches,
    benchmark_cumulative_trajectory,
    benchmark_smooth_trajectory,
    benchmark_full_plan
);
criterion_main!(benches);
