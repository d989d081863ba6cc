//! Error types shared by the buffer utilities, the FFT engine and the
//! metric derivation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Buffer size must be a positive power of two (got {0})")]
    InvalidSize(usize),

    #[error("Sample rate must be positive (got {0} Hz)")]
    InvalidSampleRate(f64),

    #[error("Expected a block of {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Paired buffers differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("Interleaved buffer must have an even length (got {0})")]
    OddLength(usize),

    #[error("Division by zero: {0}")]
    DivideByZero(&'static str),

    #[error("Statistics requested on an empty buffer")]
    EmptyBuffer,

    #[error("Bin offset {offset} out of range for a spectrum of {bins} bins")]
    InvalidOffset { offset: usize, bins: usize },

    #[error("Loudness log capacity must be non-zero")]
    InvalidCapacity,

    #[error("Loudness log is full ({0} values)")]
    LogFull(usize),

    #[error("Unknown channel '{0}' (expected left, right or mix)")]
    UnknownChannel(String),
}

pub type Result<T> = std::result::Result<T, DspError>;
