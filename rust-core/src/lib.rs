//! Spectral Meter - Real-Time FFT Metering Core
//! 
//! Radix-2 FFT engine, sample buffer utilities and spectrum-derived
//! loudness metering, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod audio;
pub mod error;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::Channel;
pub use error::{DspError, Result};
pub use spectrum::{AnalyzerConfig, FftEngine, SpectrumAnalyzer, TransformContext, WindowType};
