//! Benchmarks for the graphic equalizer cascade.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ripple_dsp::eq::GraphicalEq;

use crate::dsp::ramp;
use crate::BLOCK_SIZES;

pub fn bench_eq(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/eq");

    for &size in BLOCK_SIZES {
        let input = ramp(size);

        let mut eq = GraphicalEq::new(44_100.0);
        eq.set_calculate_responses(false);
        eq.recalculate_filters();
        for band in 0..eq.band_count() {
            eq.set_band_gain(band, if band % 2 == 0 { 3.0 } else { -3.0 })
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("cascade", size), &size, |b, _| {
            b.iter(|| eq.process(black_box(&input)))
        });
    }

    group.finish();
}
