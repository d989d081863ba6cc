//! Loudness estimate derived from the magnitude spectrum
//!
//! Sums squared bin magnitudes above a bin offset and converts to a
//! decibel value. Results are collected in a fixed-capacity log.

use crate::error::{DspError, Result};
use ringbuf::{HeapRb, Rb};
use tracing::warn;

/// Default calibration constant K in `10*log10(Σ|X|² * K)`
pub const DEFAULT_CALIBRATION: f64 = 1.0;

/// Floor for the logarithm argument, keeps silence finite (-200 dB at K = 1)
const POWER_FLOOR: f64 = 1e-20;

/// Sum of squared magnitudes for bins `offset..`
pub fn sum_squares(spectrum: &[f64], offset: usize) -> Result<f64> {
    if offset >= spectrum.len() {
        return Err(DspError::InvalidOffset {
            offset,
            bins: spectrum.len(),
        });
    }

    Ok(spectrum[offset..].iter().map(|&m| m * m).sum())
}

/// Decibel loudness estimate of a magnitude spectrum
///
/// # Arguments
/// * `spectrum` - Magnitude spectrum
/// * `offset` - Number of low bins to skip (1 excludes DC)
/// * `calibration` - Calibration constant K
///
/// # Returns
/// `10 * log10(Σ spectrum[i]² * K)` for `i >= offset`
pub fn loudness_db(spectrum: &[f64], offset: usize, calibration: f64) -> Result<f64> {
    let power = sum_squares(spectrum, offset)? * calibration;
    Ok(10.0 * power.max(POWER_FLOOR).log10())
}

/// Fixed-capacity log of loudness values
///
/// Backed by a `HeapRb` only for its fixed capacity: values are never
/// popped or overwritten, so it behaves as a capped vector. Appending to
/// a full log fails; the owner decides whether that ends the measurement.
pub struct LoudnessLog {
    values: HeapRb<f64>,
    capacity: usize,
}

impl LoudnessLog {
    /// Create an empty log holding up to `capacity` values
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DspError::InvalidCapacity);
        }

        Ok(Self {
            values: HeapRb::new(capacity),
            capacity,
        })
    }

    /// Append a value
    ///
    /// # Returns
    /// `LogFull` if the log already holds `capacity` values (value is dropped)
    pub fn push(&mut self, value: f64) -> Result<()> {
        self.values
            .push(value)
            .map_err(|_| DspError::LogFull(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent value
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().last().copied()
    }

    /// All values, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Drop all values
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl std::fmt::Debug for LoudnessLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoudnessLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Derives loudness from successive spectra and logs it
#[derive(Debug)]
pub struct LoudnessMeter {
    offset: usize,
    calibration: f64,
    log: LoudnessLog,
}

impl LoudnessMeter {
    /// # Arguments
    /// * `offset` - Low bins to skip
    /// * `calibration` - Calibration constant K
    /// * `capacity` - Number of values the log can hold
    pub fn new(offset: usize, calibration: f64, capacity: usize) -> Result<Self> {
        Ok(Self {
            offset,
            calibration,
            log: LoudnessLog::new(capacity)?,
        })
    }

    /// Compute the loudness of `spectrum` and append it to the log
    pub fn measure(&mut self, spectrum: &[f64]) -> Result<f64> {
        if self.log.is_full() {
            return Err(DspError::LogFull(self.log.capacity()));
        }

        let value = loudness_db(spectrum, self.offset, self.calibration)?;
        self.log.push(value)?;

        if self.log.is_full() {
            warn!(capacity = self.log.capacity(), "loudness log is full");
        }

        Ok(value)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    pub fn log(&self) -> &LoudnessLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut LoudnessLog {
        &mut self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_squares_skips_offset() {
        let spectrum = [10.0, 1.0, 2.0, 2.0];
        assert_eq!(sum_squares(&spectrum, 0).unwrap(), 109.0);
        assert_eq!(sum_squares(&spectrum, 1).unwrap(), 9.0);
        assert_eq!(sum_squares(&spectrum, 3).unwrap(), 4.0);
    }

    #[test]
    fn test_invalid_offset() {
        let err = sum_squares(&[1.0, 2.0], 2).unwrap_err();
        assert_eq!(err, DspError::InvalidOffset { offset: 2, bins: 2 });
        assert!(loudness_db(&[], 0, 1.0).is_err());
    }

    #[test]
    fn test_loudness_db() {
        // Σ = 9 + 1 = 10, K = 10 → 10*log10(100) = 20 dB
        let db = loudness_db(&[5.0, 3.0, 1.0], 1, 10.0).unwrap();
        assert!((db - 20.0).abs() < 1e-12);

        // Silence hits the floor instead of -inf
        let silent = loudness_db(&[0.0; 8], 1, DEFAULT_CALIBRATION).unwrap();
        assert!((silent + 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_capacity() {
        assert_eq!(LoudnessLog::new(0).unwrap_err(), DspError::InvalidCapacity);

        let mut log = LoudnessLog::new(2).unwrap();
        assert!(log.is_empty());
        log.push(-10.0).unwrap();
        log.push(-20.0).unwrap();
        assert!(log.is_full());
        assert_eq!(log.push(-30.0).unwrap_err(), DspError::LogFull(2));

        assert_eq!(log.values(), vec![-10.0, -20.0]);
        assert_eq!(log.latest(), Some(-20.0));

        log.clear();
        assert_eq!(log.len(), 0);
        assert_eq!(log.latest(), None);
    }

    #[test]
    fn test_meter_stops_when_full() {
        let mut meter = LoudnessMeter::new(1, 1.0, 3).unwrap();
        let spectrum = [0.0, 1.0, 0.0, 0.0];

        for _ in 0..3 {
            let value = meter.measure(&spectrum).unwrap();
            assert!(value.abs() < 1e-12);
        }

        assert!(meter.log().is_full());
        assert_eq!(meter.measure(&spectrum).unwrap_err(), DspError::LogFull(3));
        assert_eq!(meter.log().len(), 3);
    }
}
