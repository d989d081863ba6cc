//! High-level spectrum analyzer
//!
//! Combines windowing, the FFT engine and loudness metering for
//! block-by-block analysis of a single channel

use super::fft::FftEngine;
use super::metric::{LoudnessLog, LoudnessMeter, DEFAULT_CALIBRATION};
use super::windowing::{generate_window, window_correction_factor, WindowType};
use crate::error::{DspError, Result};
use tracing::{debug, trace};

/// How the running spectral peak behaves across blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakMode {
    /// Keep the largest peak seen since the last explicit reset
    #[default]
    Hold,

    /// Reset the peak before every block
    PerBlock,
}

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Block size (number of samples, power of 2)
    pub buffer_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Window type for spectral analysis
    pub window_type: WindowType,

    /// Apply amplitude correction for windowing
    pub apply_correction: bool,

    /// Low bins excluded from the loudness estimate
    pub bin_offset: usize,

    /// Calibration constant for the loudness estimate
    pub calibration: f64,

    /// Number of loudness values kept before the log reports full
    pub log_capacity: usize,

    /// Peak tracking behaviour
    pub peak_mode: PeakMode,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            buffer_size: 2048,
            sample_rate: 48000.0,
            window_type: WindowType::Hamming,
            apply_correction: true,
            bin_offset: 1,
            calibration: DEFAULT_CALIBRATION,
            log_capacity: 1024,
            peak_mode: PeakMode::Hold,
        }
    }
}

/// Window coefficients with the amplitude correction folded in
fn scaled_window(config: &AnalyzerConfig) -> Vec<f64> {
    let correction = if config.apply_correction {
        window_correction_factor(config.window_type, config.buffer_size)
    } else {
        1.0
    };

    generate_window(config.window_type, config.buffer_size)
        .into_iter()
        .map(|w| w * correction)
        .collect()
}

/// Block-based spectrum analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
    meter: LoudnessMeter,
    window: Vec<f64>,

    /// Windowed copy of the current block
    scratch: Vec<f64>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let fft_engine = FftEngine::new(config.buffer_size, config.sample_rate)?;
        let meter = LoudnessMeter::new(config.bin_offset, config.calibration, config.log_capacity)?;
        let window = scaled_window(&config);

        debug!(
            buffer_size = config.buffer_size,
            sample_rate = config.sample_rate,
            window = ?config.window_type,
            "created spectrum analyzer"
        );

        Ok(Self {
            scratch: vec![0.0; config.buffer_size],
            config,
            fft_engine,
            meter,
            window,
        })
    }

    /// Window and transform one block
    ///
    /// # Arguments
    /// * `block` - Exactly `buffer_size` samples
    ///
    /// # Returns
    /// Magnitude spectrum (N/2 bins), valid until the next call
    pub fn analyze(&mut self, block: &[f64]) -> Result<&[f64]> {
        // Checked before any state changes; zip below would truncate
        if block.len() != self.scratch.len() {
            return Err(DspError::SizeMismatch {
                expected: self.scratch.len(),
                actual: block.len(),
            });
        }

        if self.config.peak_mode == PeakMode::PerBlock {
            self.fft_engine.context_mut().reset_peak();
        }

        for ((dst, &s), &w) in self.scratch.iter_mut().zip(block).zip(&self.window) {
            *dst = s * w;
        }

        self.fft_engine.forward(&self.scratch)
    }

    /// Analyze and return magnitude in dB
    pub fn analyze_db(&mut self, block: &[f64], reference: f64) -> Result<Vec<f64>> {
        self.analyze(block)?;
        Ok(self.fft_engine.context().spectrum_db(reference))
    }

    /// Analyze one block and log its loudness
    ///
    /// # Returns
    /// Loudness in dB, or `LogFull` once the log has reached capacity
    pub fn process_block(&mut self, block: &[f64]) -> Result<f64> {
        if self.meter.log().is_full() {
            return Err(DspError::LogFull(self.meter.log().capacity()));
        }

        self.analyze(block)?;
        let loudness = self.meter.measure(self.fft_engine.spectrum())?;

        trace!(
            loudness,
            peak_hz = self.fft_engine.context().peak_frequency(),
            "processed block"
        );

        Ok(loudness)
    }

    /// Get frequency bins in Hz (bin centers)
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        self.fft_engine.context().frequency_axis()
    }

    /// Update configuration
    ///
    /// The engine is rebuilt only when size or rate change; the loudness
    /// log survives unless its capacity changes.
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        // Build replacements first so a rejected config leaves state untouched
        let engine = if config.buffer_size != self.config.buffer_size
            || config.sample_rate != self.config.sample_rate
        {
            Some(FftEngine::new(config.buffer_size, config.sample_rate)?)
        } else {
            None
        };

        let meter = if config.log_capacity != self.config.log_capacity {
            Some(LoudnessMeter::new(config.bin_offset, config.calibration, config.log_capacity)?)
        } else if config.bin_offset != self.config.bin_offset
            || config.calibration != self.config.calibration
        {
            let mut meter =
                LoudnessMeter::new(config.bin_offset, config.calibration, config.log_capacity)?;
            for value in self.meter.log().values() {
                meter.log_mut().push(value)?;
            }
            Some(meter)
        } else {
            None
        };

        if let Some(engine) = engine {
            self.scratch = vec![0.0; config.buffer_size];
            self.fft_engine = engine;
        }
        if let Some(meter) = meter {
            self.meter = meter;
        }
        self.window = scaled_window(&config);

        debug!(
            buffer_size = config.buffer_size,
            sample_rate = config.sample_rate,
            window = ?config.window_type,
            "updated spectrum analyzer config"
        );

        self.config = config;
        Ok(())
    }

    /// Clear the held spectral peak
    pub fn reset_peak(&mut self) {
        self.fft_engine.context_mut().reset_peak();
    }

    /// True once the loudness log is full
    pub fn is_complete(&self) -> bool {
        self.meter.log().is_full()
    }

    pub fn loudness_log(&self) -> &LoudnessLog {
        self.meter.log()
    }

    pub fn engine(&self) -> &FftEngine {
        &self.fft_engine
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.context().num_bins()
    }
}
