//! Benchmarks for the delay line variants.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ripple_dsp::delay::{MultiDelay, SingleDelay};

use crate::dsp::ramp;
use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input = ramp(size);

        let mut line = MultiDelay::new(16_384, 441, 1.0, 0.5);
        group.bench_with_input(BenchmarkId::new("feedback", size), &size, |b, _| {
            b.iter(|| line.process(black_box(&input)))
        });

        let mut line = SingleDelay::new(16_384, 441, 0.8);
        group.bench_with_input(BenchmarkId::new("feed_forward", size), &size, |b, _| {
            b.iter(|| line.process(black_box(&input)))
        });
    }

    group.finish();
}
