//! Filter Benchmarks
//!
//! Criterion benchmarks for the per-tick conditioning work.

use criterion::{Criterion, criterion_group, criterion_main};
use myohaptic_filters::prelude::*;

fn bench_high_pass_filter(c: &mut Criterion) {
    let mut state = HighPassState::new(20.0);

    c.bench_function("high_pass_filter", |b| {
        b.iter(|| {
            std::hint::black_box(high_pass_filter(
                std::hint::black_box(&mut state),
                0.001,
                std::hint::black_box(1.65),
            ));
        })
    });
}

fn bench_low_pass_filter(c: &mut Criterion) {
    let mut state = LowPassState::new(400.0);

    c.bench_function("low_pass_filter", |b| {
        b.iter(|| {
            std::hint::black_box(low_pass_filter(
                std::hint::black_box(&mut state),
                0.001,
                std::hint::black_box(0.2),
            ));
        })
    });
}

fn bench_conditioning_chain(c: &mut Criterion) {
    let mut conditioner = EmgConditioner::default();
    let mut phase = 0.0f32;

    c.bench_function("conditioning_chain", |b| {
        b.iter(|| {
            phase += 0.754;
            let voltage = 1.65 + 0.5 * phase.sin();
            std::hint::black_box(conditioner.process(0.001, std::hint::black_box(voltage)));
        })
    });
}

fn bench_position_smoother(c: &mut Criterion) {
    let mut smoother = PositionSmoother::new();

    c.bench_function("position_smoother", |b| {
        b.iter(|| {
            std::hint::black_box(smoother.push_and_average(std::hint::black_box(12.5)));
        })
    });
}

criterion_group!(
    benches,
    bench_high_pass_filter,
    bench_low_pass_filter,
    bench_conditioning_chain,
    bench_position_smoother,
);

criterion_main!(benches);
