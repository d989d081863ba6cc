//! Sample buffer preprocessing applied before the transform

pub mod buffer;
pub mod channels;

pub use buffer::{interleave, invert, mix, peak, rms};
pub use channels::{deinterleave, Channel, Deinterleaver};
