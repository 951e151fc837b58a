//! Benchmarks for the reverb network.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ripple_dsp::reverb::Reverb;

use crate::dsp::ramp;
use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let stereo = ramp(size * 2);

        let mut reverb = Reverb::new(32_768, 2_205, 0.8, 0.4, 0.6, 6_000.0);
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| reverb.process(black_box(&stereo)).unwrap())
        });
    }

    group.finish();
}
