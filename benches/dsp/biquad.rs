//! Benchmarks for the biquad section.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ripple_dsp::filter::{Biquad, BiquadKind};

use crate::dsp::ramp;
use crate::BLOCK_SIZES;

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        let input = ramp(size);

        let mut filter = Biquad::new(BiquadKind::Lowpass, 44_100.0);
        filter.set_q(0.7071);
        filter.set_f0(1_000.0);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| filter.process(black_box(&input)))
        });

        let mut filter = Biquad::new(BiquadKind::PeakingEq, 44_100.0);
        filter.set_db_gain(6.0);
        filter.set_bw(1.0);
        filter.set_f0(1_000.0);
        group.bench_with_input(BenchmarkId::new("peaking_eq", size), &size, |b, _| {
            b.iter(|| filter.process(black_box(&input)))
        });

        let stereo = ramp(size * 2);
        let mut filter = Biquad::new(BiquadKind::Lowpass, 44_100.0);
        filter.set_q(0.7071);
        filter.set_f0(1_000.0);
        group.bench_with_input(BenchmarkId::new("lowpass_stereo", size), &size, |b, _| {
            b.iter(|| filter.process_stereo(black_box(&stereo)))
        });
    }

    group.finish();
}
