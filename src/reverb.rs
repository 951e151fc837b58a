//! Stereo reverberator.
//!
//! The network composes three stages, all sized from one base delay length:
//!
//! ```text
//! in (interleaved) -> [damping lowpass L/R] -> [6 feedback delays, summed /6]
//!                         -> [6 feed-forward delays over the same sum]
//!                         -> * mix_volume -> + dry -> * master_volume
//! ```
//!
//! The feedback lines run at length multipliers `1 + i/10`, the feed-forward
//! lines at `1 + i/7`, so no two lines share a period and the tail stays
//! dense. Every feed-forward line processes the same summed signal rather
//! than the previous line's output; the stage is parallel diffusion, not a
//! serial all-pass chain.

use crate::buffer::{deinterleave, interleave, mix_sample_buffers};
use crate::delay::{MultiDelay, SingleDelay};
use crate::error::{DspError, Result};
use crate::filter::{DampedStateFilter, Filter, FilterKind};

const NR_OF_MULTIDELAYS: usize = 6;
const NR_OF_SINGLEDELAYS: usize = 6;

/// The damping filters run at a fixed rate, matching the original network
/// tuning rather than the caller's stream rate.
const DAMP_SAMPLE_RATE: f64 = 44_100.0;

/// Polarity rule for summing the delay lines: lines 1 and 2 are inverted.
#[inline]
fn invert_line(i: usize) -> bool {
    i > 0 && 2 % i == 0
}

pub struct Reverb {
    delay_in_samples: usize,
    master_volume: f64,
    mix_volume: f64,
    delay_volume: f64,
    damp_frequency: f64,

    lowpass_l: DampedStateFilter,
    lowpass_r: DampedStateFilter,
    multi_delays: Vec<MultiDelay>,
    single_delays: Vec<SingleDelay>,
}

impl Reverb {
    /// `capacity` sizes every internal circular buffer and so bounds the
    /// largest reachable delay; `delay_in_samples` is the base length the
    /// per-line multipliers scale from.
    pub fn new(
        capacity: usize,
        delay_in_samples: usize,
        master_volume: f64,
        mix_volume: f64,
        delay_volume: f64,
        damp_frequency: f64,
    ) -> Self {
        let lowpass_l =
            DampedStateFilter::new(FilterKind::Lowpass, damp_frequency, 0.0, DAMP_SAMPLE_RATE);
        let lowpass_r =
            DampedStateFilter::new(FilterKind::Lowpass, damp_frequency, 0.0, DAMP_SAMPLE_RATE);

        let multi_delays = (0..NR_OF_MULTIDELAYS)
            .map(|i| {
                let delay_multiply = 1.0 + i as f64 / 10.0;
                MultiDelay::new(
                    capacity,
                    (delay_in_samples as f64 * delay_multiply).round() as usize,
                    master_volume,
                    delay_volume,
                )
            })
            .collect();

        let single_delays = (0..NR_OF_SINGLEDELAYS)
            .map(|i| {
                let delay_multiply = 1.0 + i as f64 / 7.0;
                SingleDelay::new(
                    capacity,
                    (delay_in_samples as f64 * delay_multiply).round() as usize,
                    delay_volume,
                )
            })
            .collect();

        Self {
            delay_in_samples,
            master_volume,
            mix_volume,
            delay_volume,
            damp_frequency,

            lowpass_l,
            lowpass_r,
            multi_delays,
            single_delays,
        }
    }

    /// Change the base delay; every line is resized with its construction
    /// multiplier.
    pub fn set_delay_in_samples(&mut self, delay_in_samples: usize) {
        self.delay_in_samples = delay_in_samples;

        for (i, line) in self.single_delays.iter_mut().enumerate() {
            let delay_multiply = 1.0 + i as f64 / 7.0;
            line.set_delay_in_samples(
                (self.delay_in_samples as f64 * delay_multiply).round() as usize
            );
        }

        for (i, line) in self.multi_delays.iter_mut().enumerate() {
            let delay_multiply = 1.0 + i as f64 / 10.0;
            line.set_delay_in_samples(
                (self.delay_in_samples as f64 * delay_multiply).round() as usize
            );
        }
    }

    pub fn set_master_volume(&mut self, master_volume: f64) {
        self.master_volume = master_volume;
    }

    pub fn set_mix_volume(&mut self, mix_volume: f64) {
        self.mix_volume = mix_volume;
    }

    /// Change the feedback volume of every internal delay line.
    pub fn set_delay_volume(&mut self, delay_volume: f64) {
        self.delay_volume = delay_volume;

        for line in &mut self.single_delays {
            line.set_delay_volume(self.delay_volume);
        }
        for line in &mut self.multi_delays {
            line.set_delay_volume(self.delay_volume);
        }
    }

    /// Change the damping lowpass frequency for both channels.
    pub fn set_damp_frequency(&mut self, damp_frequency: f64) {
        self.damp_frequency = damp_frequency;
        self.lowpass_l.calc_coeff(self.damp_frequency, 0.0);
        self.lowpass_r.calc_coeff(self.damp_frequency, 0.0);
    }

    /// Add the reverb signal to an interleaved stereo buffer, returning a
    /// fresh buffer. Fails on odd-length input.
    pub fn process(&mut self, interleaved: &[f64]) -> Result<Vec<f64>> {
        if interleaved.len() % 2 != 0 {
            return Err(DspError::InvalidArgument(
                "reverb requires an interleaved stereo buffer of even length",
            ));
        }

        // Damp each channel independently to mimic high-frequency absorption
        let (mut left, mut right) = deinterleave(interleaved);
        self.lowpass_l.process(&mut left);
        self.lowpass_r.process(&mut right);
        let filtered = interleave(&left, &right)?;

        // Feedback lines in parallel over the damped signal, summed with
        // alternating polarity and gain compensation
        let mut output = vec![0.0; interleaved.len()];
        for (i, line) in self.multi_delays.iter_mut().enumerate() {
            output = mix_sample_buffers(
                &output,
                &line.process(&filtered),
                invert_line(i),
                NR_OF_MULTIDELAYS as f64,
            );
        }

        // Feed-forward diffusion: each line delays the same summed signal
        let mut diffused = vec![0.0; output.len()];
        for (i, line) in self.single_delays.iter_mut().enumerate() {
            diffused = mix_sample_buffers(&diffused, &line.process(&output), invert_line(i), 1.0);
        }

        for sample in diffused.iter_mut() {
            *sample *= self.mix_volume;
        }

        // Dry signal goes back on top, unscaled
        let mut mixed = mix_sample_buffers(&diffused, interleaved, false, 1.0);

        for sample in mixed.iter_mut() {
            *sample *= self.master_volume;
        }

        Ok(mixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_rule_inverts_lines_one_and_two() {
        let flags: Vec<bool> = (0..6).map(invert_line).collect();
        assert_eq!(flags, vec![false, true, true, false, false, false]);
    }

    #[test]
    fn odd_length_buffer_is_rejected() {
        let mut reverb = Reverb::new(4096, 100, 1.0, 1.0, 0.7, 5_000.0);
        assert!(matches!(
            reverb.process(&[0.0; 33]),
            Err(DspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn impulse_produces_dry_then_tail() {
        let base_delay = 100;
        let mut reverb = Reverb::new(8192, base_delay, 1.0, 1.0, 0.7, 10_000.0);

        let mut input = vec![0.0; 2048];
        input[0] = 1.0; // unit impulse, left channel, frame 0
        let output = reverb.process(&input).unwrap();

        // The dry impulse passes straight through
        assert_eq!(output[0], 1.0);

        // The wet path is gated by the shortest feed-forward line: nothing
        // but the dry signal may appear before the base delay elapses
        for sample in &output[1..base_delay] {
            assert_eq!(*sample, 0.0);
        }

        // A tail exists at and beyond the longest configured line
        let longest = (base_delay as f64 * (1.0 + 5.0 / 7.0)).round() as usize;
        assert!(
            output[longest..].iter().any(|&s| s.abs() > 0.0),
            "expected a reverb tail past the longest delay line"
        );
    }

    #[test]
    fn tail_outlives_the_largest_delay_line() {
        let mut reverb = Reverb::new(8192, 200, 1.0, 1.0, 0.7, 10_000.0);

        let mut input = vec![0.0; 512];
        input[0] = 1.0;
        reverb.process(&input).unwrap();

        // Several silent blocks later the feedback lines are still ringing
        let mut still_ringing = false;
        for _ in 0..4 {
            let block = reverb.process(&vec![0.0; 512]).unwrap();
            if block.iter().any(|&s| s.abs() > 1e-9) {
                still_ringing = true;
            }
        }
        assert!(still_ringing, "feedback lines should sustain a tail");
    }

    #[test]
    fn oversized_line_delays_stay_inside_capacity() {
        // Base delay 70 scales up to 120 on the longest lines, past the
        // 100 slot capacity; the lines must wrap instead of writing out of
        // bounds.
        let mut reverb = Reverb::new(100, 70, 1.0, 1.0, 0.7, 5_000.0);
        let output = reverb.process(&[0.0; 8]).unwrap();
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn silence_in_silence_out() {
        let mut reverb = Reverb::new(4096, 100, 1.0, 1.0, 0.9, 5_000.0);

        for _ in 0..4 {
            let output = reverb.process(&vec![0.0; 256]).unwrap();
            assert!(output.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn set_delay_propagates_the_multiplier_schedule() {
        let mut reverb = Reverb::new(8192, 100, 1.0, 1.0, 0.7, 5_000.0);
        reverb.set_delay_in_samples(140);

        for (i, line) in reverb.single_delays.iter().enumerate() {
            let expected = (140.0 * (1.0 + i as f64 / 7.0)).round() as usize;
            assert_eq!(line.delay_in_samples(), expected);
        }
        for (i, line) in reverb.multi_delays.iter().enumerate() {
            let expected = (140.0 * (1.0 + i as f64 / 10.0)).round() as usize;
            assert_eq!(line.delay_in_samples(), expected);
        }
    }
}
