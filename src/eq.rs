//! Graphic equalizer: a bank of cascaded peaking-EQ biquads, one per
//! octave-spaced band between a minimum and a maximum frequency.

use crate::analysis::{freqz, mag2db};
use crate::error::{DspError, Result};
use crate::filter::{Biquad, BiquadKind};
use std::f64::consts::PI;

/// Evaluation points for the cached per-band frequency responses.
const RESPONSE_POINTS: usize = 400;

pub struct GraphicalEq {
    sample_rate: f64,
    min_freq: f64,
    max_freq: f64,
    bands_per_octave: f64,

    filters: Vec<Biquad>,
    responses: Vec<Vec<f64>>,
    calculate_responses: bool,
    w: Option<Vec<f64>>,
}

impl GraphicalEq {
    /// Create an equalizer with the default 40 Hz .. 16 kHz range at one
    /// band per octave. No bands exist until [`recalculate_filters`] runs.
    ///
    /// [`recalculate_filters`]: GraphicalEq::recalculate_filters
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            min_freq: 40.0,
            max_freq: 16_000.0,
            bands_per_octave: 1.0,

            filters: Vec::new(),
            responses: Vec::new(),
            calculate_responses: true,
            w: None,
        }
    }

    /// Rebuild the band stack from the current range and density.
    ///
    /// Band `i` is centered at `minFreq * 2^(i / bandsPerOctave)` with a
    /// bandwidth of `1 / bandsPerOctave` octaves and 0 dB initial gain.
    pub fn recalculate_filters(&mut self) {
        let band_count =
            ((self.max_freq / self.min_freq).log2() * self.bands_per_octave).round() as usize;

        self.filters.clear();
        self.responses = vec![Vec::new(); band_count];

        for i in 0..band_count {
            let freq = self.min_freq * 2.0f64.powf(i as f64 / self.bands_per_octave);
            let mut filter = Biquad::new(BiquadKind::PeakingEq, self.sample_rate);
            filter.set_db_gain(0.0);
            filter.set_bw(1.0 / self.bands_per_octave);
            filter.set_f0(freq);
            self.filters.push(filter);
            self.recalculate_response(i);
        }
    }

    pub fn band_count(&self) -> usize {
        self.filters.len()
    }

    pub fn set_minimum_frequency(&mut self, freq: f64) {
        self.min_freq = freq;
        self.recalculate_filters();
    }

    pub fn set_maximum_frequency(&mut self, freq: f64) {
        self.max_freq = freq;
        self.recalculate_filters();
    }

    pub fn set_bands_per_octave(&mut self, bands: f64) {
        self.bands_per_octave = bands;
        self.recalculate_filters();
    }

    /// Enable or disable the per-band response cache refresh.
    pub fn set_calculate_responses(&mut self, calculate: bool) {
        self.calculate_responses = calculate;
    }

    /// Set the gain of one band in dB.
    ///
    /// A zero (or NaN) gain is rejected as invalid. That also rejects a
    /// legitimate 0 dB request; bands start at 0 dB, so the quirk is kept.
    pub fn set_band_gain(&mut self, index: usize, gain: f64) -> Result<()> {
        if index >= self.filters.len() {
            return Err(DspError::IndexOutOfRange {
                index,
                len: self.filters.len(),
            });
        }

        if gain == 0.0 || gain.is_nan() {
            return Err(DspError::InvalidArgument("a gain must be passed"));
        }

        self.filters[index].set_db_gain(gain);
        self.recalculate_response(index);
        Ok(())
    }

    /// Cached magnitude response of one band in dB over
    /// [`RESPONSE_POINTS`] points covering `[0, PI)`.
    pub fn band_response(&self, index: usize) -> Result<&[f64]> {
        self.responses
            .get(index)
            .map(|r| r.as_slice())
            .ok_or(DspError::IndexOutOfRange {
                index,
                len: self.responses.len(),
            })
    }

    fn recalculate_response(&mut self, index: usize) {
        if !self.calculate_responses {
            return;
        }

        let w = self.w.get_or_insert_with(|| {
            (0..RESPONSE_POINTS)
                .map(|i| (PI / RESPONSE_POINTS as f64) * i as f64)
                .collect()
        });

        let (b, a) = self.filters[index].coefficients();
        self.responses[index] = mag2db(&freqz(&b, &a, w));
    }

    /// Cascade every band over a mono buffer in index order.
    pub fn process(&mut self, buffer: &[f64]) -> Vec<f64> {
        let mut output = buffer.to_vec();
        for filter in &mut self.filters {
            output = filter.process(&output);
        }
        output
    }

    /// Cascade every band over an interleaved stereo buffer.
    pub fn process_stereo(&mut self, buffer: &[f64]) -> Vec<f64> {
        let mut output = buffer.to_vec();
        for filter in &mut self.filters {
            output = filter.process_stereo(&output);
        }
        output
    }
}
