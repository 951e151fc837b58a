//! Helpers for moving samples between mono and interleaved-stereo layouts.
//!
//! Interleaved buffers alternate channels: `[L0, R0, L1, R1, ..]`. All
//! helpers allocate a fresh output buffer; the inputs are left untouched
//! except where the signature takes `&mut`.

use crate::error::{DspError, Result};

/// Channel selector for [`deinterleave_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
    /// Average of left and right.
    Mix,
}

/// Combine split-stereo (dual mono) buffers into one interleaved buffer.
pub fn interleave(left: &[f64], right: &[f64]) -> Result<Vec<f64>> {
    if left.len() != right.len() {
        return Err(DspError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut interleaved = vec![0.0; left.len() * 2];
    for (i, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
        interleaved[2 * i] = l;
        interleaved[2 * i + 1] = r;
    }

    Ok(interleaved)
}

/// Split an interleaved stereo buffer into (left, right) mono buffers.
///
/// A trailing unpaired sample on an odd-length buffer is dropped.
pub fn deinterleave(buffer: &[f64]) -> (Vec<f64>, Vec<f64>) {
    (
        deinterleave_channel(Channel::Left, buffer),
        deinterleave_channel(Channel::Right, buffer),
    )
}

/// Extract a single channel from an interleaved stereo buffer.
pub fn deinterleave_channel(channel: Channel, buffer: &[f64]) -> Vec<f64> {
    let len = buffer.len() / 2;
    let mut out = vec![0.0; len];

    for (i, slot) in out.iter_mut().enumerate() {
        *slot = match channel {
            Channel::Left => buffer[2 * i],
            Channel::Right => buffer[2 * i + 1],
            Channel::Mix => (buffer[2 * i] + buffer[2 * i + 1]) / 2.0,
        };
    }

    out
}

/// Mix two equally laid-out sample buffers into a new buffer.
///
/// `b` can be negated (phase flip) while mixing, and `volume_correction`
/// tames the sum when many buffers are accumulated. The output has the
/// length of `a`; `b` is read at the same indices.
pub fn mix_sample_buffers(a: &[f64], b: &[f64], negate: bool, volume_correction: f64) -> Vec<f64> {
    let mut out = a.to_vec();

    for (slot, &sample) in out.iter_mut().zip(b.iter()) {
        let mixed = if negate { -sample } else { sample };
        *slot += mixed / volume_correction;
    }

    out
}

/// Invert the phase of a signal in place.
pub fn invert(buffer: &mut [f64]) {
    for sample in buffer.iter_mut() {
        *sample = -*sample;
    }
}

/// Root-mean-square level of a signal.
pub fn rms(buffer: &[f64]) -> f64 {
    let total: f64 = buffer.iter().map(|s| s * s).sum();
    (total / buffer.len() as f64).sqrt()
}

/// Absolute peak level of a signal.
pub fn peak(buffer: &[f64]) -> f64 {
    buffer.iter().fold(0.0, |acc, s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_rejects_mismatched_channels() {
        let left = [0.1, 0.2, 0.3];
        let right = [0.4, 0.5];

        assert_eq!(
            interleave(&left, &right),
            Err(DspError::LengthMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn interleave_roundtrips_with_deinterleave() {
        let left = [0.1, -0.2, 0.3];
        let right = [-0.4, 0.5, -0.6];

        let stereo = interleave(&left, &right).unwrap();
        assert_eq!(stereo, vec![0.1, -0.4, -0.2, 0.5, 0.3, -0.6]);

        let (l, r) = deinterleave(&stereo);
        assert_eq!(l, left.to_vec());
        assert_eq!(r, right.to_vec());
    }

    #[test]
    fn mix_channel_averages_pairs() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mix = deinterleave_channel(Channel::Mix, &stereo);
        assert_eq!(mix, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn mix_sample_buffers_negates_and_corrects() {
        let a = [1.0, 1.0];
        let b = [0.5, -0.5];

        let mixed = mix_sample_buffers(&a, &b, true, 2.0);
        assert_eq!(mixed, vec![0.75, 1.25]);
    }

    #[test]
    fn rms_and_peak_of_known_signal() {
        let buffer = [3.0, -4.0];
        assert!((rms(&buffer) - (12.5f64).sqrt()).abs() < 1e-12);
        assert_eq!(peak(&buffer), 4.0);
    }
}
