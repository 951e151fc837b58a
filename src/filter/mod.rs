//! Recursive (IIR) filter family.
//!
//! All concrete filters share one flat capability: recompute coefficients
//! from (cutoff, resonance), process a buffer in place, and optionally attach
//! an envelope that cross-fades dry and filtered signal per sample. There is
//! no deeper hierarchy; the [`IirFilter`] facade dispatches over boxed
//! [`Filter`] implementations.

/// RBJ-cookbook biquad with nine selectable designs.
pub mod biquad;
/// 2-pole, 4-tap-state filter with selectable output tap.
pub mod damped;
/// Facade selecting a concrete filter implementation by kind.
pub mod facade;
/// 2-pole lowpass built on a mass-spring recursion.
pub mod lp12;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::envelope::EnvelopeRef;
use crate::error::Result;

pub use biquad::{Biquad, BiquadKind};
pub use damped::DampedStateFilter;
pub use facade::IirFilter;
pub use lp12::Lp12;

/// Response selector shared by the 4-tap state filter and the facade.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
    Bandpass,
    BandReject,
    /// Mass-spring 12 dB/octave lowpass variant.
    Lp12,
}

impl FilterKind {
    /// Index of this response in the 4-tap state vector.
    pub(crate) fn tap_index(self) -> usize {
        match self {
            FilterKind::Lowpass | FilterKind::Lp12 => 0,
            FilterKind::Highpass => 1,
            FilterKind::Bandpass => 2,
            FilterKind::BandReject => 3,
        }
    }
}

/// Capability shared by every concrete filter.
///
/// Implementations are stateful: recursion memory persists across `process`
/// calls and is only cleared by reconstruction.
pub trait Filter {
    /// Recompute the recursion coefficients for a new cutoff and resonance.
    fn calc_coeff(&mut self, cutoff: f64, resonance: f64);

    /// Filter a mono buffer in place, carrying state across calls.
    fn process(&mut self, buffer: &mut [f64]);

    /// Attach a shared envelope; the filter advances it one step per sample.
    fn add_envelope(&mut self, envelope: EnvelopeRef) -> Result<()>;

    fn cutoff(&self) -> f64;

    fn resonance(&self) -> f64;
}
