//! Realtime-safe digital audio building blocks.
//!
//! The crate centers on a family of second-order recursive (IIR) filters and
//! the delay/reverb network composed from them. Everything processes plain
//! `f64` sample buffers, one block at a time, with per-instance state carried
//! across calls. Stereo buffers are interleaved `[L0, R0, L1, R1, ..]`.
//!
//! Instances are stateful and not reentrant: one instance per channel/voice,
//! access serialized by the caller. Parameter changes take effect at the next
//! processed sample.

/// Frequency-response evaluation helpers (`freqz`, `mag2db`).
pub mod analysis;
/// Interleave/deinterleave and mixing helpers for sample buffers.
pub mod buffer;
/// Feedback and feed-forward circular-buffer delay lines.
pub mod delay;
/// Envelope capability trait and the linear ADSR implementation.
pub mod envelope;
/// Graphic equalizer built from cascaded peaking-EQ biquads.
pub mod eq;
/// Error taxonomy shared across the crate.
pub mod error;
/// Recursive filter family: biquad, LP12, damped state filter, facade.
pub mod filter;
/// Stereo reverberator composed from delay lines and damping filters.
pub mod reverb;

pub use envelope::{Adsr, Envelope, EnvelopeRef};
pub use error::{DspError, Result};
