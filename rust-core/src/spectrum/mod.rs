//! Spectral analysis with a radix-2 FFT

pub mod context;
pub mod fft;
pub mod windowing;
pub mod metric;
pub mod analysis;

pub use context::TransformContext;
pub use fft::{FftEngine, FftTables};
pub use windowing::{apply_window, WindowType};
pub use metric::{loudness_db, LoudnessLog, LoudnessMeter};
pub use analysis::{AnalyzerConfig, PeakMode, SpectrumAnalyzer};
