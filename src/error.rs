use thiserror::Error;

/// Failures surfaced synchronously to the caller. Nothing is retried or
/// recovered internally. Numeric edge cases (degenerate coefficients, NaN
/// radicands) are not errors; they propagate through the sample stream.
#[derive(Debug, Error, PartialEq)]
pub enum DspError {
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("can not interleave, channel lengths differ ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, DspError>;
