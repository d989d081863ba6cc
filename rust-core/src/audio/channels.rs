//! Stereo channel selection
//!
//! Splits an interleaved stereo buffer into a single mono channel

use crate::error::{DspError, Result};
use std::str::FromStr;

/// Channel selector for deinterleaving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Even-indexed samples
    Left,

    /// Odd-indexed samples
    Right,

    /// Arithmetic mean of each left/right pair
    Mix,
}

impl Channel {
    #[inline]
    fn select(&self, left: f64, right: f64) -> f64 {
        match self {
            Channel::Left => left,
            Channel::Right => right,
            Channel::Mix => (left + right) / 2.0,
        }
    }
}

impl FromStr for Channel {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Channel::Left),
            "right" | "r" => Ok(Channel::Right),
            "mix" | "m" => Ok(Channel::Mix),
            _ => Err(DspError::UnknownChannel(s.to_string())),
        }
    }
}

fn check_even(buffer: &[f64]) -> Result<()> {
    if buffer.len() % 2 != 0 {
        return Err(DspError::OddLength(buffer.len()));
    }
    Ok(())
}

fn fill_channel(channel: Channel, buffer: &[f64], out: &mut [f64]) {
    for (dst, pair) in out.iter_mut().zip(buffer.chunks_exact(2)) {
        *dst = channel.select(pair[0], pair[1]);
    }
}

/// Extract one channel from an interleaved stereo buffer
///
/// # Arguments
/// * `channel` - Which channel to extract
/// * `buffer` - Interleaved samples, even length
///
/// # Returns
/// New buffer of length `buffer.len() / 2`
pub fn deinterleave(channel: Channel, buffer: &[f64]) -> Result<Vec<f64>> {
    check_even(buffer)?;

    let mut out = vec![0.0; buffer.len() / 2];
    fill_channel(channel, buffer, &mut out);
    Ok(out)
}

/// Deinterleaver with per-channel scratch buffers
///
/// Avoids an allocation per block when the same stereo block size is
/// processed repeatedly. Scratch buffers are resized whenever the input
/// length changes, so a returned slice always matches the current input.
#[derive(Debug, Default)]
pub struct Deinterleaver {
    left: Vec<f64>,
    right: Vec<f64>,
    mix: Vec<f64>,
}

impl Deinterleaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract one channel into the matching scratch buffer
    ///
    /// The returned slice is only valid until the next call.
    pub fn process(&mut self, channel: Channel, buffer: &[f64]) -> Result<&[f64]> {
        check_even(buffer)?;

        let scratch = match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
            Channel::Mix => &mut self.mix,
        };

        let len = buffer.len() / 2;
        if scratch.len() != len {
            scratch.resize(len, 0.0);
        }

        fill_channel(channel, buffer, scratch);
        Ok(scratch.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::buffer::interleave;

    #[test]
    fn test_deinterleave_channels() {
        let stereo = [1.0, 3.0, 2.0, 4.0];

        assert_eq!(deinterleave(Channel::Left, &stereo).unwrap(), vec![1.0, 2.0]);
        assert_eq!(deinterleave(Channel::Right, &stereo).unwrap(), vec![3.0, 4.0]);
        assert_eq!(deinterleave(Channel::Mix, &stereo).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_deinterleave_odd_length() {
        let err = deinterleave(Channel::Left, &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, DspError::OddLength(3));
    }

    #[test]
    fn test_mix_of_identical_channels_is_identity() {
        let mono = vec![0.1, -0.4, 0.7, 0.0];
        let stereo = interleave(&mono, &mono).unwrap();
        assert_eq!(deinterleave(Channel::Mix, &stereo).unwrap(), mono);
    }

    #[test]
    fn test_scratch_follows_input_length() {
        let mut deinterleaver = Deinterleaver::new();

        let long = deinterleaver.process(Channel::Left, &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
        assert_eq!(long, &[1.0, 2.0, 3.0]);

        // Shorter input must not leak samples from the previous call
        let short = deinterleaver.process(Channel::Left, &[5.0, 0.0]).unwrap();
        assert_eq!(short, &[5.0]);

        let grown = deinterleaver.process(Channel::Left, &[7.0, 0.0, 8.0, 0.0]).unwrap();
        assert_eq!(grown, &[7.0, 8.0]);
    }

    #[test]
    fn test_channel_from_str() {
        assert_eq!("left".parse::<Channel>().unwrap(), Channel::Left);
        assert_eq!("RIGHT".parse::<Channel>().unwrap(), Channel::Right);
        assert_eq!("mix".parse::<Channel>().unwrap(), Channel::Mix);
        assert!(matches!("centre".parse::<Channel>(), Err(DspError::UnknownChannel(_))));
    }
}
