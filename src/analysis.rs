//! Frequency-response evaluation for rational (IIR) filters.
//!
//! `freqz` evaluates the transfer function magnitude at arbitrary angular
//! frequencies; `mag2db` converts magnitudes to decibels with a -120 dB
//! floor. The graphic equalizer uses both to cache per-band response curves.

use std::f64::consts::{PI, TAU};

/// Magnitude response of the filter `b(z)/a(z)` at the angular frequencies
/// `w` (radians per sample, normally within `[-PI, PI]`).
pub fn freqz(b: &[f64], a: &[f64], w: &[f64]) -> Vec<f64> {
    let mut result = vec![0.0; w.len()];

    for (slot, &wi) in result.iter_mut().zip(w.iter()) {
        let mut num = (0.0, 0.0);
        for (j, &bj) in b.iter().enumerate() {
            num.0 += bj * (-(j as f64) * wi).cos();
            num.1 += bj * (-(j as f64) * wi).sin();
        }

        let mut den = (0.0, 0.0);
        for (j, &aj) in a.iter().enumerate() {
            den.0 += aj * (-(j as f64) * wi).cos();
            den.1 += aj * (-(j as f64) * wi).sin();
        }

        *slot = (num.0 * num.0 + num.1 * num.1).sqrt() / (den.0 * den.0 + den.1 * den.1).sqrt();
    }

    result
}

/// Magnitude response over `count` points evenly covering `[-PI, PI)`.
pub fn freqz_default(b: &[f64], a: &[f64], count: usize) -> Vec<f64> {
    let w: Vec<f64> = (0..count)
        .map(|i| (TAU / count as f64) * i as f64 - PI)
        .collect();
    freqz(b, a, &w)
}

/// Convert linear magnitudes to decibels, floored at -120 dB.
pub fn mag2db(buffer: &[f64]) -> Vec<f64> {
    let min_db = -120.0;
    let min_mag = 10.0f64.powf(min_db / 20.0);

    buffer
        .iter()
        .map(|&mag| 20.0 * mag.max(min_mag).log10())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_filter_is_unity_everywhere() {
        let w: Vec<f64> = (0..64).map(|i| (PI / 64.0) * i as f64).collect();
        let response = freqz(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &w);

        for mag in response {
            assert!((mag - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn one_pole_lowpass_attenuates_high_frequencies() {
        // y[n] = 0.5 x[n] + 0.5 y[n-1]: magnitude falls toward w = PI
        let b = [0.5];
        let a = [1.0, -0.5];
        let response = freqz(&b, &a, &[0.0, PI]);

        assert!((response[0] - 1.0).abs() < 1e-12);
        assert!(response[1] < 0.5);
    }

    #[test]
    fn default_grid_is_symmetric_for_real_coefficients() {
        // Real coefficients give a magnitude response symmetric around
        // w = 0; the default grid covers [-PI, PI) so mirrored points match.
        let response = freqz_default(&[0.5], &[1.0, -0.5], 8);

        assert_eq!(response.len(), 8);
        assert!((response[4] - 1.0).abs() < 1e-12); // w = 0
        for i in 1..4 {
            assert!((response[i] - response[8 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn mag2db_floors_at_minus_120() {
        let db = mag2db(&[1.0, 0.0]);
        assert!((db[0] - 0.0).abs() < 1e-12);
        assert!((db[1] + 120.0).abs() < 1e-9);
    }
}
