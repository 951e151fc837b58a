use std::f64::consts::TAU;

use crate::envelope::EnvelopeRef;
use crate::error::Result;
use crate::filter::Filter;

/// 12 dB/octave lowpass built on a mass-spring recursion.
///
/// The state is a (position, velocity) pair driven toward the input sample:
/// `c` plays the spring constant, `r` the damping. Resonance close to 1
/// leaves the spring ringing at the cutoff frequency.
pub struct Lp12 {
    cutoff: f64,
    resonance: f64,
    sample_rate: f64,

    vibra_pos: f64,
    vibra_speed: f64,

    w: f64,
    q: f64,
    r: f64,
    c: f64,

    envelope: Option<EnvelopeRef>,
}

impl Lp12 {
    pub fn new(cutoff: f64, resonance: f64, sample_rate: f64) -> Self {
        let mut filter = Self {
            cutoff,
            resonance,
            sample_rate,

            vibra_pos: 0.0,
            vibra_speed: 0.0,

            w: 0.0,
            q: 0.0,
            r: 0.0,
            c: 0.0,

            envelope: None,
        };
        filter.calc_coeff(cutoff, resonance);
        filter
    }
}

impl Filter for Lp12 {
    fn calc_coeff(&mut self, cutoff: f64, resonance: f64) {
        self.w = TAU * cutoff / self.sample_rate;
        self.q = 1.0 - self.w / (2.0 * (resonance + 0.5 / (1.0 + self.w)) + self.w - 2.0);
        self.r = self.q * self.q;
        self.c = self.r + 1.0 - 2.0 * self.w.cos() * self.q;

        self.cutoff = cutoff;
        self.resonance = resonance;
    }

    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            self.vibra_speed += (*sample - self.vibra_pos) * self.c;
            self.vibra_pos += self.vibra_speed;
            self.vibra_speed *= self.r;

            if let Some(envelope) = &self.envelope {
                let amplitude = envelope.borrow_mut().advance_and_read();
                *sample = *sample * (1.0 - amplitude) + self.vibra_pos * amplitude;
            } else {
                *sample = self.vibra_pos;
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
