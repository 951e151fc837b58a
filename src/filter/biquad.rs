use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::envelope::EnvelopeRef;
use crate::error::{DspError, Result};
use crate::filter::Filter;

/*
Second-order IIR section, coefficients derived from analog prototypes via the
bilinear transform (the RBJ "Audio EQ Cookbook" equations).

| kind           | H(s)                                            |
| -------------- | ----------------------------------------------- |
| low-pass       | 1 / (s^2 + s/Q + 1)                             |
| high-pass      | s^2 / (s^2 + s/Q + 1)                           |
| band-pass (skirt) | s / (s^2 + s/Q + 1), peak gain = Q           |
| band-pass (peak)  | (s/Q) / (s^2 + s/Q + 1), 0 dB peak           |
| notch          | (s^2 + 1) / (s^2 + s/Q + 1)                     |
| all-pass       | (s^2 - s/Q + 1) / (s^2 + s/Q + 1)               |
| peaking EQ     | (s^2 + s·A/Q + 1) / (s^2 + s/(A·Q) + 1)         |
| low shelf      | A·(s^2 + s·sqrt(A)/Q + A) / (A·s^2 + s·sqrt(A)/Q + 1) |
| high shelf     | A·(A·s^2 + s·sqrt(A)/Q + 1) / (s^2 + s·sqrt(A)/Q + A) |

Coefficients are recomputed only when a setter fires; there is no lazy
invalidation, so stale coefficients persist until the next explicit change.
The recursion always runs on the a0-normalized ratios.
*/

/// The nine biquad designs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadKind {
    Lowpass,
    Highpass,
    /// Constant skirt gain, peak gain = Q.
    BandpassSkirt,
    /// Constant 0 dB peak gain.
    BandpassPeak,
    Notch,
    Allpass,
    PeakingEq,
    LowShelf,
    HighShelf,
}

/// Which of {Q, bandwidth, shelf slope} drives the alpha computation.
///
/// Set implicitly by the last of `set_q` / `set_bw` / `set_s` called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlphaParam {
    Q,
    Bandwidth,
    ShelfSlope,
}

pub struct Biquad {
    kind: BiquadKind,
    sample_rate: f64,
    param: AlphaParam,

    // Significant frequency: center, corner or shelf-midpoint depending on kind
    f0: f64,
    // Used only by the peaking and shelving designs
    db_gain: f64,
    q: f64,
    // Bandwidth in octaves between -3 dB points (or midpoint-gain points for peaking EQ)
    bw: f64,
    // Shelf slope; 1.0 is the steepest monotonic shelf
    s: f64,

    // Raw coefficients
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,

    // a0-normalized ratios used by the recursion
    b0a0: f64,
    b1a0: f64,
    b2a0: f64,
    a1a0: f64,
    a2a0: f64,

    // Recursion memory, independent per stereo channel
    x1_l: f64,
    x2_l: f64,
    y1_l: f64,
    y2_l: f64,
    x1_r: f64,
    x2_r: f64,
    y1_r: f64,
    y2_r: f64,
}

impl Biquad {
    /// Create a biquad with identity coefficients.
    ///
    /// The defaults (`f0 = 3000`, `Q = 1`, `dBgain = 12`) only take effect
    /// once a setter triggers the first recomputation.
    pub fn new(kind: BiquadKind, sample_rate: f64) -> Self {
        Self {
            kind,
            sample_rate,
            param: AlphaParam::Q,

            f0: 3000.0,
            db_gain: 12.0,
            q: 1.0,
            bw: -3.0,
            s: 1.0,

            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,

            b0a0: 1.0,
            b1a0: 0.0,
            b2a0: 0.0,
            a1a0: 0.0,
            a2a0: 0.0,

            x1_l: 0.0,
            x2_l: 0.0,
            y1_l: 0.0,
            y2_l: 0.0,
            x1_r: 0.0,
            x2_r: 0.0,
            y1_r: 0.0,
            y2_r: 0.0,
        }
    }

    /// Raw `(b, a)` coefficient triples.
    pub fn coefficients(&self) -> ([f64; 3], [f64; 3]) {
        ([self.b0, self.b1, self.b2], [self.a0, self.a1, self.a2])
    }

    pub fn set_filter_type(&mut self, kind: BiquadKind) {
        self.kind = kind;
        self.recalculate_coefficients();
    }

    pub fn set_sample_rate(&mut self, rate: f64) {
        self.sample_rate = rate;
        self.recalculate_coefficients();
    }

    pub fn set_q(&mut self, q: f64) {
        self.param = AlphaParam::Q;
        self.q = q.clamp(0.001, 115.0);
        self.recalculate_coefficients();
    }

    pub fn set_bw(&mut self, bw: f64) {
        self.param = AlphaParam::Bandwidth;
        self.bw = bw;
        self.recalculate_coefficients();
    }

    pub fn set_s(&mut self, s: f64) {
        self.param = AlphaParam::ShelfSlope;
        self.s = s.clamp(0.0001, 5.0);
        self.recalculate_coefficients();
    }

    pub fn set_f0(&mut self, freq: f64) {
        self.f0 = freq;
        self.recalculate_coefficients();
    }

    pub fn set_db_gain(&mut self, gain: f64) {
        self.db_gain = gain;
        self.recalculate_coefficients();
    }

    pub fn recalculate_coefficients(&mut self) {
        let a = if matches!(
            self.kind,
            BiquadKind::PeakingEq | BiquadKind::LowShelf | BiquadKind::HighShelf
        ) {
            10.0f64.powf(self.db_gain / 40.0)
        } else {
            10.0f64.powf(self.db_gain / 20.0).sqrt()
        };

        let w0 = TAU * self.f0 / self.sample_rate;
        let cosw0 = w0.cos();
        let sinw0 = w0.sin();

        let alpha = match self.param {
            AlphaParam::Q => sinw0 / (2.0 * self.q),
            AlphaParam::Bandwidth => {
                sinw0 * ((2.0f64.ln() / 2.0) * self.bw * w0 / sinw0).sinh()
            }
            AlphaParam::ShelfSlope => {
                (sinw0 / 2.0) * ((a + 1.0 / a) * (1.0 / self.s - 1.0) + 2.0).sqrt()
            }
        };

        match self.kind {
            BiquadKind::Lowpass => {
                self.b0 = (1.0 - cosw0) / 2.0;
                self.b1 = 1.0 - cosw0;
                self.b2 = (1.0 - cosw0) / 2.0;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::Highpass => {
                self.b0 = (1.0 + cosw0) / 2.0;
                self.b1 = -(1.0 + cosw0);
                self.b2 = (1.0 + cosw0) / 2.0;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::BandpassSkirt => {
                self.b0 = sinw0 / 2.0;
                self.b1 = 0.0;
                self.b2 = -sinw0 / 2.0;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::BandpassPeak => {
                self.b0 = alpha;
                self.b1 = 0.0;
                self.b2 = -alpha;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::Notch => {
                self.b0 = 1.0;
                self.b1 = -2.0 * cosw0;
                self.b2 = 1.0;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::Allpass => {
                self.b0 = 1.0 - alpha;
                self.b1 = -2.0 * cosw0;
                self.b2 = 1.0 + alpha;
                self.a0 = 1.0 + alpha;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha;
            }

            BiquadKind::PeakingEq => {
                self.b0 = 1.0 + alpha * a;
                self.b1 = -2.0 * cosw0;
                self.b2 = 1.0 - alpha * a;
                self.a0 = 1.0 + alpha / a;
                self.a1 = -2.0 * cosw0;
                self.a2 = 1.0 - alpha / a;
            }

            BiquadKind::LowShelf => {
                // Radicand can go negative for steep slopes; the resulting
                // NaN propagates through the stream unguarded.
                let coeff =
                    sinw0 * ((a * a + 1.0) * (1.0 / self.s - 1.0) + 2.0 * a).sqrt();
                self.b0 = a * (a + 1.0 - (a - 1.0) * cosw0 + coeff);
                self.b1 = 2.0 * a * (a - 1.0 - (a + 1.0) * cosw0);
                self.b2 = a * (a + 1.0 - (a - 1.0) * cosw0 - coeff);
                self.a0 = a + 1.0 + (a - 1.0) * cosw0 + coeff;
                self.a1 = -2.0 * (a - 1.0 + (a + 1.0) * cosw0);
                self.a2 = a + 1.0 + (a - 1.0) * cosw0 - coeff;
            }

            BiquadKind::HighShelf => {
                let coeff =
                    sinw0 * ((a * a + 1.0) * (1.0 / self.s - 1.0) + 2.0 * a).sqrt();
                self.b0 = a * (a + 1.0 + (a - 1.0) * cosw0 + coeff);
                self.b1 = -2.0 * a * (a - 1.0 + (a + 1.0) * cosw0);
                self.b2 = a * (a + 1.0 + (a - 1.0) * cosw0 - coeff);
                self.a0 = a + 1.0 - (a - 1.0) * cosw0 + coeff;
                self.a1 = 2.0 * (a - 1.0 - (a + 1.0) * cosw0);
                self.a2 = a + 1.0 - (a - 1.0) * cosw0 - coeff;
            }
        }

        self.b0a0 = self.b0 / self.a0;
        self.b1a0 = self.b1 / self.a0;
        self.b2a0 = self.b2 / self.a0;
        self.a1a0 = self.a1 / self.a0;
        self.a2a0 = self.a2 / self.a0;
    }

    #[inline]
    fn next_sample(
        &self,
        x: f64,
        x1: &mut f64,
        x2: &mut f64,
        y1: &mut f64,
        y2: &mut f64,
    ) -> f64 {
        // y[n] = (b0/a0) x[n] + (b1/a0) x[n-1] + (b2/a0) x[n-2]
        //        - (a1/a0) y[n-1] - (a2/a0) y[n-2]
        let y = self.b0a0 * x + self.b1a0 * *x1 + self.b2a0 * *x2
            - self.a1a0 * *y1
            - self.a2a0 * *y2;

        *y2 = *y1;
        *y1 = y;
        *x2 = *x1;
        *x1 = x;

        y
    }

    /// Filter a mono buffer into a fresh output buffer.
    pub fn process(&mut self, buffer: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; buffer.len()];

        let (mut x1, mut x2, mut y1, mut y2) = (self.x1_l, self.x2_l, self.y1_l, self.y2_l);
        for (slot, &x) in output.iter_mut().zip(buffer.iter()) {
            *slot = self.next_sample(x, &mut x1, &mut x2, &mut y1, &mut y2);
        }
        self.x1_l = x1;
        self.x2_l = x2;
        self.y1_l = y1;
        self.y2_l = y2;

        output
    }

    /// Filter an interleaved stereo buffer with independent L/R state.
    pub fn process_stereo(&mut self, buffer: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; buffer.len()];

        let (mut x1_l, mut x2_l, mut y1_l, mut y2_l) =
            (self.x1_l, self.x2_l, self.y1_l, self.y2_l);
        let (mut x1_r, mut x2_r, mut y1_r, mut y2_r) =
            (self.x1_r, self.x2_r, self.y1_r, self.y2_r);

        for i in 0..buffer.len() / 2 {
            output[2 * i] =
                self.next_sample(buffer[2 * i], &mut x1_l, &mut x2_l, &mut y1_l, &mut y2_l);
            output[2 * i + 1] = self.next_sample(
                buffer[2 * i + 1],
                &mut x1_r,
                &mut x2_r,
                &mut y1_r,
                &mut y2_r,
            );
        }

        self.x1_l = x1_l;
        self.x2_l = x2_l;
        self.y1_l = y1_l;
        self.y2_l = y2_l;
        self.x1_r = x1_r;
        self.x2_r = x2_r;
        self.y1_r = y1_r;
        self.y2_r = y2_r;

        output
    }
}

impl Filter for Biquad {
    /// Maps the generic (cutoff, resonance) pair onto (f0, Q).
    fn calc_coeff(&mut self, cutoff: f64, resonance: f64) {
        self.f0 = cutoff;
        self.param = AlphaParam::Q;
        self.q = resonance.clamp(0.001, 115.0);
        self.recalculate_coefficients();
    }

    fn process(&mut self, buffer: &mut [f64]) {
        let output = Biquad::process(self, buffer);
        buffer.copy_from_slice(&output);
    }

    fn add_envelope(&mut self, _envelope: EnvelopeRef) -> Result<()> {
        Err(DspError::InvalidArgument(
            "biquad sections do not support envelope modulation",
        ))
    }

    fn cutoff(&self) -> f64 {
        self.f0
    }

    fn resonance(&self) -> f64 {
        self.q
    }
}
