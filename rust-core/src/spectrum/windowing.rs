//! Windowing functions for spectral analysis
//!
//! Applies windows to time-domain blocks before the FFT to reduce spectral leakage

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    #[default]
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    // Degenerate lengths would divide by M-1 = 0
    if length < 2 || window_type == WindowType::Rectangular {
        return vec![1.0; length];
    }

    let denom = (length - 1) as f64;

    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / denom;
            match window_type {
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
                WindowType::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Apply window to signal
///
/// # Returns
/// Windowed copy of `signal`
pub fn apply_window(signal: &[f64], window_type: WindowType) -> Vec<f64> {
    let mut windowed = signal.to_vec();
    apply_window_inplace(&mut windowed, window_type);
    windowed
}

/// Apply window in-place
pub fn apply_window_inplace(signal: &mut [f64], window_type: WindowType) {
    let window = generate_window(window_type, signal.len());

    for (s, w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Calculate window amplitude correction factor
///
/// Windowing lowers the measured amplitude of a tone; multiplying the
/// magnitude spectrum by this factor restores it.
///
/// # Returns
/// `length / Σw[n]` (1.0 for an empty window)
pub fn window_correction_factor(window_type: WindowType, length: usize) -> f64 {
    let sum: f64 = generate_window(window_type, length).iter().sum();
    if sum == 0.0 {
        return 1.0;
    }
    length as f64 / sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);
        let blackman = generate_window(WindowType::Blackman, length);

        assert_eq!(hann.len(), length);

        // Symmetric with unit center
        let center = length / 2;
        for w in [&hann, &hamming, &blackman] {
            assert!((w[0] - w[length - 1]).abs() < 1e-10);
            assert!((w[center] - 1.0).abs() < 1e-10);
        }

        // Hamming keeps 0.08 at the edges, Hann goes to zero
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
        assert!(hann[0].abs() < 1e-12);
    }

    #[test]
    fn test_apply_window() {
        let signal = vec![1.0; 101];
        let windowed = apply_window(&signal, WindowType::Hamming);

        assert_eq!(windowed.len(), 101);
        assert!((windowed[50] - 1.0).abs() < 1e-10);
        assert!(windowed[0] < 0.1);
        assert!(windowed[100] < 0.1);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Blackman, 1), vec![1.0]);
        assert_eq!(window_correction_factor(WindowType::Hann, 0), 1.0);
    }

    #[test]
    fn test_correction_factor() {
        let factor_rect = window_correction_factor(WindowType::Rectangular, 100);
        let factor_hamming = window_correction_factor(WindowType::Hamming, 100);

        assert!((factor_rect - 1.0).abs() < 1e-12);

        // Hamming coherent gain ≈ 0.54
        assert!(factor_hamming > 1.5 && factor_hamming < 2.5);
    }
}
