use std::cell::RefCell;
use std::rc::Rc;

/*
Envelope capability
===================

Filters that support envelope modulation cross-fade between the dry input and
the filtered output, weighted by the envelope's instantaneous amplitude. The
contract that makes this work is the side-effecting read:

    the FILTER drives envelope time, calling advance_and_read() exactly
    once per processed sample.

The envelope is a shared cursor: its owner triggers note_on/note_off, while
the filter consuming it advances its position sample by sample. Skipping the
advance desynchronizes the envelope from audio time, which is why the trait
exposes `advance_and_read` rather than a pure getter.

The concrete implementation is a linear ADSR over absolute sample positions:

  amplitude
    1.0 |    /\
        |   /  \__________
    S   |  /              \
        | /                \
    0.0 |/__________________\___ samples
        attack decay sustain release
*/

/// Amplitude source consumed by the envelope-modulatable filters.
///
/// Reading the value advances the envelope's internal sample position by one.
pub trait Envelope {
    /// Current amplitude in `[0, 1]`, advancing the cursor as a side effect.
    fn advance_and_read(&mut self) -> f64;

    /// False once the envelope has run past its release (or was disabled).
    fn is_active(&self) -> bool;
}

/// Shared handle to an externally owned envelope.
///
/// Single-threaded by design; the filter holds a reference, never ownership.
pub type EnvelopeRef = Rc<RefCell<dyn Envelope>>;

/// Linear attack/decay/sustain/release envelope.
///
/// Stage lengths are given in seconds and fixed to absolute sample positions
/// at construction. The cursor counts processed samples; `note_off` truncates
/// the sustain stage at the current cursor so release starts immediately.
pub struct Adsr {
    sustain_level: f64,
    // Kept in seconds so note_on can restore a truncated sustain stage
    sustain_length: f64,
    sample_rate: f64,

    // Stage lengths in samples
    attack_samples: f64,
    decay_samples: f64,
    sustain_samples: f64,
    release_samples: f64,

    // Absolute stage end positions in samples
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,

    // Cursor; -1 marks a disabled envelope
    samples_processed: f64,
}

impl Adsr {
    pub fn new(
        attack_length: f64,
        decay_length: f64,
        sustain_level: f64,
        sustain_length: f64,
        release_length: f64,
        sample_rate: f64,
    ) -> Self {
        let mut adsr = Self {
            sustain_level,
            sustain_length,
            sample_rate,

            attack_samples: attack_length * sample_rate,
            decay_samples: decay_length * sample_rate,
            sustain_samples: sustain_length * sample_rate,
            release_samples: release_length * sample_rate,

            attack: 0.0,
            decay: 0.0,
            sustain: 0.0,
            release: 0.0,

            samples_processed: 0.0,
        };
        adsr.update();
        adsr
    }

    /// Recompute the absolute stage end positions from the stage lengths.
    fn update(&mut self) {
        self.attack = self.attack_samples;
        self.decay = self.attack + self.decay_samples;
        self.sustain = self.decay + self.sustain_samples;
        self.release = self.sustain + self.release_samples;
    }

    /// Restart the envelope from the beginning of the attack stage.
    pub fn note_on(&mut self) {
        self.samples_processed = 0.0;
        self.sustain_samples = self.sustain_length * self.sample_rate;
        self.update();
    }

    /// End the sustain stage at the current cursor so release begins now.
    pub fn note_off(&mut self) {
        self.sustain_samples = self.samples_processed - self.decay_samples;
        self.update();
    }

    /// Amplitude at the current cursor, without advancing it.
    pub fn value(&self) -> f64 {
        let pos = self.samples_processed;

        if pos <= self.attack {
            pos / self.attack
        } else if pos <= self.decay {
            1.0 + (self.sustain_level - 1.0) * ((pos - self.attack) / (self.decay - self.attack))
        } else if pos <= self.sustain {
            self.sustain_level
        } else if pos <= self.release {
            self.sustain_level
                + (0.0 - self.sustain_level) * ((pos - self.sustain) / (self.release - self.sustain))
        } else {
            0.0
        }
    }

    /// Apply the envelope to a buffer, advancing one sample per element.
    pub fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample *= self.value();
            self.samples_processed += 1.0;
        }
    }

    /// Park the cursor so the envelope reports inactive.
    pub fn disable(&mut self) {
        self.samples_processed = -1.0;
    }
}

impl Envelope for Adsr {
    fn advance_and_read(&mut self) -> f64 {
        let amplitude = self.value();
        self.samples_processed += 1.0;
        amplitude
    }

    fn is_active(&self) -> bool {
        !(self.samples_processed > self.release || self.samples_processed == -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 1_000.0;

    fn advance(env: &mut Adsr, samples: usize) {
        for _ in 0..samples {
            env.advance_and_read();
        }
    }

    #[test]
    fn attack_ramps_to_full_level() {
        let mut env = Adsr::new(0.01, 0.05, 0.7, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();

        advance(&mut env, 10);
        assert!((env.value() - 1.0).abs() < 1e-9, "attack should end at 1.0");

        let mut env = Adsr::new(0.01, 0.05, 0.7, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();
        advance(&mut env, 5);
        assert!((env.value() - 0.5).abs() < 1e-9, "attack should be linear");
    }

    #[test]
    fn sustain_holds_configured_level() {
        let mut env = Adsr::new(0.01, 0.05, 0.6, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();

        // Past attack (10) and decay (50), inside sustain
        advance(&mut env, 100);
        assert!((env.value() - 0.6).abs() < 1e-9);
        assert!(env.is_active());
    }

    #[test]
    fn release_falls_to_zero_and_deactivates() {
        let mut env = Adsr::new(0.01, 0.05, 0.6, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();

        // Attack 10 + decay 50 + sustain 100 + release 50 = 210 samples total
        advance(&mut env, 211);
        assert_eq!(env.value(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn note_off_truncates_sustain() {
        let mut env = Adsr::new(0.01, 0.05, 0.6, 10.0, 0.05, SAMPLE_RATE);
        env.note_on();

        advance(&mut env, 80);
        env.note_off();

        // Release (50 samples) should complete long before the original
        // 10 second sustain would have ended.
        advance(&mut env, 70);
        assert!(!env.is_active());
    }

    #[test]
    fn advance_and_read_moves_one_sample_per_call() {
        let mut env = Adsr::new(0.01, 0.05, 0.6, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();

        let first = env.advance_and_read();
        let second = env.advance_and_read();
        assert_eq!(first, 0.0);
        assert!((second - 0.1).abs() < 1e-9, "one attack step per read");
    }

    #[test]
    fn disable_parks_the_envelope() {
        let mut env = Adsr::new(0.01, 0.05, 0.6, 0.1, 0.05, SAMPLE_RATE);
        env.note_on();
        env.disable();
        assert!(!env.is_active());
    }
}
