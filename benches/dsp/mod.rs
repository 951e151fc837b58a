mod biquad;
mod delay;
mod eq;
mod reverb;

pub use biquad::bench_biquad;
pub use delay::bench_delay;
pub use eq::bench_eq;
pub use reverb::bench_reverb;

/// Sawtooth-like test ramp in [-1, 1].
pub fn ramp(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| (i as f64 / len as f64) * 2.0 - 1.0)
        .collect()
}
