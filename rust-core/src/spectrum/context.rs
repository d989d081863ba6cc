//! Per-size transform state
//!
//! Holds the real/imaginary working buffers, the magnitude spectrum and
//! the running peak for one transform size and sample rate.

use crate::error::{DspError, Result};
use num_complex::Complex;

/// Transform state shared by the forward and inverse paths
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Block size N (power of two)
    buffer_size: usize,

    /// Sample rate in Hz
    sample_rate: f64,

    /// Width of one bin in Hz
    bandwidth: f64,

    /// Real part of the last transform (length N)
    pub(crate) real: Vec<f64>,

    /// Imaginary part of the last transform (length N)
    pub(crate) imag: Vec<f64>,

    /// Magnitude spectrum (length N/2)
    spectrum: Vec<f64>,

    /// Largest magnitude seen since the last reset
    peak: f64,

    /// Bin index of `peak`
    peak_band: usize,
}

impl TransformContext {
    /// Create transform state
    ///
    /// # Arguments
    /// * `buffer_size` - Block size, must be a positive power of two
    /// * `sample_rate` - Sample rate in Hz, must be positive
    pub fn new(buffer_size: usize, sample_rate: f64) -> Result<Self> {
        if buffer_size == 0 || !buffer_size.is_power_of_two() {
            return Err(DspError::InvalidSize(buffer_size));
        }
        // Rejects NaN as well
        if !(sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }

        let bandwidth = 2.0 / buffer_size as f64 * sample_rate / 2.0;

        Ok(Self {
            buffer_size,
            sample_rate,
            bandwidth,
            real: vec![0.0; buffer_size],
            imag: vec![0.0; buffer_size],
            spectrum: vec![0.0; buffer_size / 2],
            peak: 0.0,
            peak_band: 0,
        })
    }

    /// Same size and rate with zeroed buffers and peak
    pub(crate) fn cleared(&self) -> Self {
        Self {
            buffer_size: self.buffer_size,
            sample_rate: self.sample_rate,
            bandwidth: self.bandwidth,
            real: vec![0.0; self.buffer_size],
            imag: vec![0.0; self.buffer_size],
            spectrum: vec![0.0; self.buffer_size / 2],
            peak: 0.0,
            peak_band: 0,
        }
    }

    /// Block size N
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Bin width in Hz
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of spectrum bins (N/2)
    pub fn num_bins(&self) -> usize {
        self.spectrum.len()
    }

    /// Center frequency of bin `index` in Hz
    ///
    /// Meaningful for `index < N/2`.
    pub fn band_frequency(&self, index: usize) -> f64 {
        self.bandwidth * index as f64 + self.bandwidth / 2.0
    }

    /// Center frequencies of every bin in Hz
    pub fn frequency_axis(&self) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.band_frequency(bin))
            .collect()
    }

    /// Recompute the magnitude spectrum from `real`/`imag`
    ///
    /// Also raises `peak`/`peak_band` when a bin exceeds the recorded peak.
    /// The peak is never lowered here; call [`reset_peak`](Self::reset_peak)
    /// to start a fresh measurement.
    pub fn calculate_spectrum(&mut self) -> &[f64] {
        let scale = 2.0 / self.buffer_size as f64;

        for (i, mag_out) in self.spectrum.iter_mut().enumerate() {
            let re = self.real[i];
            let im = self.imag[i];
            let mag = scale * (re * re + im * im).sqrt();

            if mag > self.peak {
                self.peak = mag;
                self.peak_band = i;
            }

            *mag_out = mag;
        }

        &self.spectrum
    }

    /// Clear the running peak
    pub fn reset_peak(&mut self) {
        self.peak = 0.0;
        self.peak_band = 0;
    }

    /// Largest bin magnitude since the last reset
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Bin index of the peak
    pub fn peak_band(&self) -> usize {
        self.peak_band
    }

    /// Center frequency of the peak bin in Hz
    pub fn peak_frequency(&self) -> f64 {
        self.band_frequency(self.peak_band)
    }

    /// Magnitude spectrum of the last transform
    ///
    /// Borrowed view; it is overwritten by the next transform on this context.
    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    /// Magnitude spectrum in dB: 20*log10(mag/reference)
    pub fn spectrum_db(&self, reference: f64) -> Vec<f64> {
        self.spectrum
            .iter()
            .map(|&mag| {
                let mag_clamped = mag.max(1e-10);  // Avoid log(0)
                20.0 * (mag_clamped / reference).log10()
            })
            .collect()
    }

    /// Real part of the last transform
    pub fn real(&self) -> &[f64] {
        &self.real
    }

    /// Imaginary part of the last transform
    pub fn imag(&self) -> &[f64] {
        &self.imag
    }

    /// Complex bins for k = 0..N/2
    pub fn bins(&self) -> impl Iterator<Item = Complex<f64>> + '_ {
        self.real
            .iter()
            .zip(self.imag.iter())
            .take(self.num_bins())
            .map(|(&re, &im)| Complex::new(re, im))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_size() {
        assert_eq!(TransformContext::new(100, 44100.0).unwrap_err(), DspError::InvalidSize(100));
        assert_eq!(TransformContext::new(0, 44100.0).unwrap_err(), DspError::InvalidSize(0));
    }

    #[test]
    fn test_rejects_invalid_sample_rate() {
        assert!(matches!(
            TransformContext::new(1024, 0.0),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            TransformContext::new(1024, -48000.0),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            TransformContext::new(1024, f64::NAN),
            Err(DspError::InvalidSampleRate(_))
        ));
    }

    #[test]
    fn test_bandwidth_and_band_frequency() {
        let ctx = TransformContext::new(1024, 44100.0).unwrap();

        assert_eq!(ctx.num_bins(), 512);
        assert!((ctx.bandwidth() - 44100.0 / 1024.0).abs() < 1e-12);

        // Bin centers sit half a bin above the lower edge
        let bw = ctx.bandwidth();
        assert!((ctx.band_frequency(0) - bw / 2.0).abs() < 1e-12);
        assert!((ctx.band_frequency(10) - 10.5 * bw).abs() < 1e-9);

        let axis = ctx.frequency_axis();
        assert_eq!(axis.len(), 512);
        assert!(axis[511] < 22050.0);
    }

    #[test]
    fn test_spectrum_and_peak_tracking() {
        let mut ctx = TransformContext::new(8, 8000.0).unwrap();
        ctx.real[2] = 4.0;
        ctx.imag[2] = 3.0;

        let spectrum = ctx.calculate_spectrum().to_vec();
        assert_eq!(spectrum.len(), 4);
        assert!((spectrum[2] - 2.0 / 8.0 * 5.0).abs() < 1e-12);
        assert_eq!(spectrum[0], 0.0);

        assert_eq!(ctx.peak_band(), 2);
        assert!((ctx.peak() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_peak_holds_until_reset() {
        let mut ctx = TransformContext::new(8, 8000.0).unwrap();
        ctx.real[1] = 8.0;
        ctx.calculate_spectrum();
        assert_eq!(ctx.peak_band(), 1);
        assert!((ctx.peak() - 2.0).abs() < 1e-12);

        // A quieter block does not lower the held peak
        ctx.real[1] = 0.0;
        ctx.real[3] = 4.0;
        ctx.calculate_spectrum();
        assert_eq!(ctx.peak_band(), 1);
        assert!((ctx.peak() - 2.0).abs() < 1e-12);

        ctx.reset_peak();
        ctx.calculate_spectrum();
        assert_eq!(ctx.peak_band(), 3);
        assert!((ctx.peak() - 1.0).abs() < 1e-12);
        assert!((ctx.peak_frequency() - ctx.band_frequency(3)).abs() < 1e-12);
    }

    #[test]
    fn test_spectrum_db_floor() {
        let ctx = TransformContext::new(8, 8000.0).unwrap();
        let db = ctx.spectrum_db(1.0);
        assert!(db.iter().all(|&v| (v + 200.0).abs() < 1e-9));
    }
}
