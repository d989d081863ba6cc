//! Python bindings for the FFT engine and spectrum analyzer

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::spectrum::{AnalyzerConfig, FftEngine, PeakMode, SpectrumAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Radix-2 FFT engine exposed to Python
#[pyclass(name = "FftEngine")]
pub struct PyFftEngine {
    engine: FftEngine,
}

#[pymethods]
impl PyFftEngine {
    /// Create a new FFT engine
    ///
    /// Args:
    ///     buffer_size: Block size (power of 2)
    ///     sample_rate: Sample rate in Hz
    #[new]
    #[pyo3(signature = (buffer_size=1024, sample_rate=44100.0))]
    fn new(buffer_size: usize, sample_rate: f64) -> PyResult<Self> {
        Ok(Self {
            engine: FftEngine::new(buffer_size, sample_rate)?,
        })
    }

    /// Forward transform
    ///
    /// Args:
    ///     buffer: Exactly buffer_size samples
    ///
    /// Returns:
    ///     Magnitude spectrum (buffer_size / 2 bins)
    fn forward<'py>(
        &mut self,
        py: Python<'py>,
        buffer: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.engine.forward(buffer.as_slice()?)?;
        Ok(PyArray1::from_slice(py, spectrum))
    }

    /// Inverse transform
    ///
    /// Args:
    ///     real: Real part (defaults to the last forward result)
    ///     imag: Imaginary part (defaults to the last forward result)
    ///
    /// Returns:
    ///     Time-domain samples
    #[pyo3(signature = (real=None, imag=None))]
    fn inverse<'py>(
        &mut self,
        py: Python<'py>,
        real: Option<PyReadonlyArray1<f64>>,
        imag: Option<PyReadonlyArray1<f64>>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let real = real.as_ref().map(|a| a.as_slice()).transpose()?;
        let imag = imag.as_ref().map(|a| a.as_slice()).transpose()?;
        let samples = self.engine.inverse(real, imag)?;
        Ok(PyArray1::from_vec(py, samples))
    }

    /// Center frequency of a bin in Hz
    fn band_frequency(&self, index: usize) -> f64 {
        self.engine.context().band_frequency(index)
    }

    /// Clear the held peak
    fn reset_peak(&mut self) {
        self.engine.context_mut().reset_peak();
    }

    #[getter]
    fn peak(&self) -> f64 {
        self.engine.context().peak()
    }

    #[getter]
    fn peak_band(&self) -> usize {
        self.engine.context().peak_band()
    }

    #[getter]
    fn bandwidth(&self) -> f64 {
        self.engine.context().bandwidth()
    }

    #[getter]
    fn buffer_size(&self) -> usize {
        self.engine.buffer_size()
    }

    /// Copy of the last magnitude spectrum
    fn spectrum<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_slice(py, self.engine.spectrum()))
    }
}

/// Spectrum analyzer with loudness metering exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     buffer_size: Block size (power of 2)
    ///     sample_rate: Sample rate in Hz
    ///     window_type: Window type for analysis
    ///     bin_offset: Low bins excluded from loudness
    ///     calibration: Loudness calibration constant
    ///     log_capacity: Number of loudness values to keep
    ///     peak_per_block: Reset the spectral peak before every block
    #[new]
    #[pyo3(signature = (
        buffer_size=2048,
        sample_rate=48000.0,
        window_type=PyWindowType::Hamming,
        bin_offset=1,
        calibration=1.0,
        log_capacity=1024,
        peak_per_block=false
    ))]
    fn new(
        buffer_size: usize,
        sample_rate: f64,
        window_type: PyWindowType,
        bin_offset: usize,
        calibration: f64,
        log_capacity: usize,
        peak_per_block: bool,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            buffer_size,
            sample_rate,
            window_type: window_type.into(),
            bin_offset,
            calibration,
            log_capacity,
            peak_mode: if peak_per_block { PeakMode::PerBlock } else { PeakMode::Hold },
            ..AnalyzerConfig::default()
        };

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config)?,
        })
    }

    /// Analyze one block and log its loudness
    ///
    /// Returns:
    ///     Loudness in dB (raises ValueError once the log is full)
    fn process_block(&mut self, block: PyReadonlyArray1<f64>) -> PyResult<f64> {
        Ok(self.analyzer.process_block(block.as_slice()?)?)
    }

    /// Analyze signal and return magnitude spectrum
    fn analyze<'py>(
        &mut self,
        py: Python<'py>,
        block: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.analyzer.analyze(block.as_slice()?)?;
        Ok(PyArray1::from_slice(py, spectrum))
    }

    /// Analyze signal and return magnitude in dB
    #[pyo3(signature = (block, reference=1.0))]
    fn analyze_db<'py>(
        &mut self,
        py: Python<'py>,
        block: PyReadonlyArray1<f64>,
        reference: f64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.analyzer.analyze_db(block.as_slice()?, reference)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.analyzer.frequency_bins_hz()))
    }

    /// Logged loudness values, oldest first
    fn loudness_values<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.analyzer.loudness_log().values()))
    }

    /// True once the loudness log is full
    fn is_complete(&self) -> bool {
        self.analyzer.is_complete()
    }

    /// Clear the held spectral peak
    fn reset_peak(&mut self) {
        self.analyzer.reset_peak();
    }

    /// Get number of frequency bins
    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }
}
