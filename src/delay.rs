//! Circular-buffer delay lines.
//!
//! Two variants share the buffer mechanics: [`MultiDelay`] feeds its own
//! delayed, attenuated output back into the line (a comb filter), while
//! [`SingleDelay`] buffers the raw dry input and emits a pure delay with no
//! self-feedback (the diffusion stage of the reverb).
//!
//! Both keep an input (write) and an output (read) pointer into a buffer of
//! fixed capacity, and both wrap the pointers at `capacity - 1` rather than
//! `capacity`. One slot is therefore never used and the delayed signal skips
//! a sample on each wraparound. That off-by-one is inherited behavior, kept
//! for bit-compatibility with existing material (see DESIGN.md).

/// Feedback delay line: the delayed output is mixed back into the buffer.
pub struct MultiDelay {
    buffer: Vec<f64>,
    input_pointer: usize,
    output_pointer: usize,

    delay_in_samples: usize,
    master_volume: f64,
    delay_volume: f64,
}

impl MultiDelay {
    /// `capacity` fixes the maximum delay; it is never resized. A delay at
    /// or beyond `capacity` wraps, same as [`set_delay_in_samples`].
    ///
    /// [`set_delay_in_samples`]: MultiDelay::set_delay_in_samples
    pub fn new(
        capacity: usize,
        delay_in_samples: usize,
        master_volume: f64,
        delay_volume: f64,
    ) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            input_pointer: delay_in_samples % capacity,
            output_pointer: 0,

            delay_in_samples,
            master_volume,
            delay_volume,
        }
    }

    pub fn delay_in_samples(&self) -> usize {
        self.delay_in_samples
    }

    /// Re-derive the write pointer from the read pointer and the new delay.
    pub fn set_delay_in_samples(&mut self, delay_in_samples: usize) {
        self.delay_in_samples = delay_in_samples;
        self.input_pointer = (self.output_pointer + delay_in_samples) % self.buffer.len();
    }

    /// 0.0 silence, 1.0 unity, above 1.0 amplification.
    pub fn set_master_volume(&mut self, master_volume: f64) {
        self.master_volume = master_volume;
    }

    /// Feedback level; values at or above 1.0 make the line self-sustaining.
    pub fn set_delay_volume(&mut self, delay_volume: f64) {
        self.delay_volume = delay_volume;
    }

    /// Mix the delayed signal into the input and return a fresh buffer.
    ///
    /// Works on mono and interleaved buffers alike; the line is agnostic to
    /// channel layout as long as the delay is a multiple of the frame size.
    pub fn process(&mut self, samples: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; samples.len()];

        for (slot, &input) in output.iter_mut().zip(samples.iter()) {
            let delayed = self.buffer[self.output_pointer];

            // Feedback path: the mixed sample re-enters the line
            let mixed = delayed * self.delay_volume + input;
            self.buffer[self.input_pointer] = mixed;

            *slot = mixed * self.master_volume;

            self.input_pointer += 1;
            if self.input_pointer >= self.buffer.len() - 1 {
                self.input_pointer = 0;
            }

            self.output_pointer += 1;
            if self.output_pointer >= self.buffer.len() - 1 {
                self.output_pointer = 0;
            }
        }

        output
    }
}

/// Feed-forward delay line: buffers the dry input, no self-feedback.
pub struct SingleDelay {
    buffer: Vec<f64>,
    input_pointer: usize,
    output_pointer: usize,

    delay_in_samples: usize,
    delay_volume: f64,
}

impl SingleDelay {
    pub fn new(capacity: usize, delay_in_samples: usize, delay_volume: f64) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            input_pointer: delay_in_samples % capacity,
            output_pointer: 0,

            delay_in_samples,
            delay_volume,
        }
    }

    pub fn delay_in_samples(&self) -> usize {
        self.delay_in_samples
    }

    pub fn set_delay_in_samples(&mut self, delay_in_samples: usize) {
        self.delay_in_samples = delay_in_samples;
        self.input_pointer = (self.output_pointer + delay_in_samples) % self.buffer.len();
    }

    pub fn set_delay_volume(&mut self, delay_volume: f64) {
        self.delay_volume = delay_volume;
    }

    /// Return the delayed (attenuated) signal only; the dry input is not
    /// part of the output.
    pub fn process(&mut self, samples: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; samples.len()];

        for (slot, &input) in output.iter_mut().zip(samples.iter()) {
            self.buffer[self.input_pointer] = input;

            let delayed = self.buffer[self.output_pointer];
            *slot = delayed * self.delay_volume;

            self.input_pointer += 1;
            if self.input_pointer >= self.buffer.len() - 1 {
                self.input_pointer = 0;
            }

            self.output_pointer += 1;
            if self.output_pointer >= self.buffer.len() - 1 {
                self.output_pointer = 0;
            }
        }

        output
    }
}
