//! Sample buffer utilities
//!
//! Stateless helpers used on raw blocks before they reach the FFT engine

use crate::error::{DspError, Result};

/// Negate every sample in place (phase inversion)
///
/// # Returns
/// The same buffer, for chaining
pub fn invert(buffer: &mut [f64]) -> &mut [f64] {
    for sample in buffer.iter_mut() {
        *sample = -*sample;
    }
    buffer
}

/// Interleave two mono channels into one stereo buffer
///
/// # Arguments
/// * `left` - Left channel samples
/// * `right` - Right channel samples (same length as `left`)
///
/// # Returns
/// Buffer of length `2 * N` ordered `[l0, r0, l1, r1, ...]`
pub fn interleave(left: &[f64], right: &[f64]) -> Result<Vec<f64>> {
    if left.len() != right.len() {
        return Err(DspError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut stereo = Vec::with_capacity(left.len() * 2);
    for (&l, &r) in left.iter().zip(right.iter()) {
        stereo.push(l);
        stereo.push(r);
    }

    Ok(stereo)
}

/// Mix two buffers: `out[i] = a[i] + (±b[i]) / volume_correction`
///
/// # Arguments
/// * `a` - First buffer
/// * `b` - Second buffer (same length as `a`)
/// * `negate` - Subtract `b` instead of adding it
/// * `volume_correction` - Divisor applied to `b`, must be non-zero
pub fn mix(a: &[f64], b: &[f64], negate: bool, volume_correction: f64) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(DspError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if volume_correction == 0.0 {
        return Err(DspError::DivideByZero("volume correction"));
    }

    let sign = if negate { -1.0 } else { 1.0 };

    Ok(a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| x + sign * y / volume_correction)
        .collect())
}

/// Root mean square level of a buffer
pub fn rms(buffer: &[f64]) -> Result<f64> {
    if buffer.is_empty() {
        return Err(DspError::EmptyBuffer);
    }

    let sum_of_squares: f64 = buffer.iter().map(|&x| x * x).sum();
    Ok((sum_of_squares / buffer.len() as f64).sqrt())
}

/// Absolute peak level of a buffer (0.0 when empty)
pub fn peak(buffer: &[f64]) -> f64 {
    buffer.iter().fold(0.0, |max, &x| x.abs().max(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_in_place() {
        let mut buffer = vec![0.5, -0.25, 0.0, 1.0];
        invert(&mut buffer);
        assert_eq!(buffer, vec![-0.5, 0.25, 0.0, -1.0]);

        // Inverting twice restores the signal
        invert(invert(&mut buffer));
        assert_eq!(buffer, vec![-0.5, 0.25, 0.0, -1.0]);
    }

    #[test]
    fn test_interleave_pairs() {
        let stereo = interleave(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert_eq!(stereo, vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_interleave_length_mismatch() {
        let err = interleave(&[1.0, 2.0, 3.0], &[1.0]).unwrap_err();
        assert_eq!(err, DspError::LengthMismatch { left: 3, right: 1 });
    }

    #[test]
    fn test_mix_negated_with_correction() {
        let out = mix(&[2.0, 2.0], &[2.0, 2.0], true, 2.0).unwrap();
        assert_eq!(out, vec![1.0, 1.0]);

        let out = mix(&[2.0, 2.0], &[2.0, 4.0], false, 2.0).unwrap();
        assert_eq!(out, vec![3.0, 4.0]);
    }

    #[test]
    fn test_mix_rejects_zero_correction() {
        let err = mix(&[1.0], &[1.0], false, 0.0).unwrap_err();
        assert!(matches!(err, DspError::DivideByZero(_)));

        let err = mix(&[1.0], &[1.0, 2.0], false, 1.0).unwrap_err();
        assert!(matches!(err, DspError::LengthMismatch { .. }));
    }

    #[test]
    fn test_rms_and_peak() {
        let silence = vec![0.0; 64];
        assert_eq!(rms(&silence).unwrap(), 0.0);
        assert_eq!(peak(&silence), 0.0);

        // Square wave at ±0.5 has RMS 0.5
        let square: Vec<f64> = (0..64).map(|n| if n % 2 == 0 { 0.5 } else { -0.5 }).collect();
        assert!((rms(&square).unwrap() - 0.5).abs() < 1e-12);

        assert_eq!(peak(&[0.1, -0.9, 0.3]), 0.9);
    }

    #[test]
    fn test_statistics_on_empty_buffer() {
        assert_eq!(rms(&[]).unwrap_err(), DspError::EmptyBuffer);
        assert_eq!(peak(&[]), 0.0);
    }
}
