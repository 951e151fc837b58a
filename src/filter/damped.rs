use std::f64::consts::PI;

use crate::envelope::EnvelopeRef;
use crate::error::Result;
use crate::filter::{Filter, FilterKind};

/// 2-pole filter holding a 4-tap state vector
/// `[lowpass, highpass, bandpass, bandreject]`; the configured kind selects
/// which tap is read as output.
///
/// Each sample runs the tap update twice (double-pass, oversampling the
/// recursion for stability) and averages the two tap reads.
pub struct DampedStateFilter {
    kind: FilterKind,
    cutoff: f64,
    resonance: f64,
    sample_rate: f64,

    taps: [f64; 4],
    freq: f64,
    damp: f64,

    envelope: Option<EnvelopeRef>,
}

impl DampedStateFilter {
    pub fn new(kind: FilterKind, cutoff: f64, resonance: f64, sample_rate: f64) -> Self {
        let mut filter = Self {
            kind,
            cutoff,
            resonance,
            sample_rate,

            taps: [0.0; 4],
            freq: 0.0,
            damp: 0.0,

            envelope: None,
        };
        filter.calc_coeff(cutoff, resonance);
        filter
    }

    #[inline]
    fn update_taps(&mut self, input: f64) -> f64 {
        let f = &mut self.taps;

        f[3] = input - self.damp * f[2];
        f[0] += self.freq * f[2];
        f[1] = f[3] - f[0];
        f[2] = self.freq * f[1] + f[2];

        f[self.kind.tap_index()]
    }
}

impl Filter for DampedStateFilter {
    fn calc_coeff(&mut self, cutoff: f64, resonance: f64) {
        // Cutoff is capped at a quarter of the doubled sample rate; the damp
        // term keeps the double-pass recursion inside its stability region.
        self.freq = 2.0 * (PI * (cutoff / (self.sample_rate * 2.0)).min(0.25)).sin();
        self.damp = (2.0 * (1.0 - resonance.powf(0.25)))
            .min((2.0f64).min(2.0 / self.freq - self.freq * 0.5));

        self.cutoff = cutoff;
        self.resonance = resonance;
    }

    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            let input = *sample;

            let mut output = 0.5 * self.update_taps(input);
            output += 0.5 * self.update_taps(input);

            if let Some(envelope) = &self.envelope {
                let amplitude = envelope.borrow_mut().advance_and_read();
                *sample = input * (1.0 - amplitude) + output * amplitude;
            } else {
                *sample = output;
            }
        }
    }

    fn add_envelope(&mut self, envelope: EnvelopeRef) -> Result<()> {
        self.envelope = Some(envelope);
        Ok(())
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn resonance(&self) -> f64 {
        self.resonance
    }
}
