//! Radix-2 FFT engine
//!
//! Iterative decimation-in-time Cooley-Tukey transform over precomputed
//! bit-reversal and twiddle tables. Optimized for repeated transforms of
//! one fixed block size without per-call allocation.

use super::context::TransformContext;
use crate::error::{DspError, Result};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::debug;

/// Precomputed tables for one transform size
///
/// Immutable after construction, so one set can back any number of
/// engines through an `Arc`.
#[derive(Debug)]
pub struct FftTables {
    size: usize,
    reverse_table: Vec<usize>,
    sin_table: Vec<f64>,
    cos_table: Vec<f64>,
}

impl FftTables {
    /// Build tables for a power-of-two `size`
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(DspError::InvalidSize(size));
        }

        // Each doubling stage appends the previous table shifted by the
        // next lower bit.
        let mut reverse_table = vec![0usize; size];
        let mut limit = 1;
        let mut bit = size >> 1;
        while limit < size {
            for i in 0..limit {
                reverse_table[i + limit] = reverse_table[i] + bit;
            }
            limit <<= 1;
            bit >>= 1;
        }

        // Index k holds the rotation step for half-size k. Index 0 would be
        // -π/0; it keeps the identity rotation and is never read.
        let mut sin_table = vec![0.0; size];
        let mut cos_table = vec![0.0; size];
        cos_table[0] = 1.0;
        for k in 1..size {
            let angle = -PI / k as f64;
            sin_table[k] = angle.sin();
            cos_table[k] = angle.cos();
        }

        Ok(Self {
            size,
            reverse_table,
            sin_table,
            cos_table,
        })
    }

    /// Transform size N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bit-reversal permutation of `0..N`
    pub fn reverse_table(&self) -> &[usize] {
        &self.reverse_table
    }

    pub fn sin_table(&self) -> &[f64] {
        &self.sin_table
    }

    pub fn cos_table(&self) -> &[f64] {
        &self.cos_table
    }

    /// Run all butterfly stages in place on bit-reversed input
    fn butterflies(&self, real: &mut [f64], imag: &mut [f64]) {
        let n = self.size;
        let mut half_size = 1;

        while half_size < n {
            let step_real = self.cos_table[half_size];
            let step_imag = self.sin_table[half_size];

            let mut phase_real = 1.0;
            let mut phase_imag = 0.0;

            for fft_step in 0..half_size {
                let mut i = fft_step;

                while i < n {
                    let off = i + half_size;
                    let tr = phase_real * real[off] - phase_imag * imag[off];
                    let ti = phase_real * imag[off] + phase_imag * real[off];

                    real[off] = real[i] - tr;
                    imag[off] = imag[i] - ti;
                    real[i] += tr;
                    imag[i] += ti;

                    i += half_size << 1;
                }

                // Advance the phase by one twiddle step
                let tmp_real = phase_real;
                phase_real = tmp_real * step_real - phase_imag * step_imag;
                phase_imag = tmp_real * step_imag + phase_imag * step_real;
            }

            half_size <<= 1;
        }
    }
}

/// FFT engine for one block size and sample rate
///
/// Owns its transform context and scratch buffers exclusively; engines
/// for parallel channels share tables via [`FftEngine::sibling`].
#[derive(Debug)]
pub struct FftEngine {
    /// Shared read-only tables
    tables: Arc<FftTables>,

    /// Working buffers, spectrum and peak state
    context: TransformContext,

    /// Scratch for the inverse transform (bit-reversed input)
    scratch_real: Vec<f64>,
    scratch_imag: Vec<f64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `buffer_size` - Block size N, power of two
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(buffer_size: usize, sample_rate: f64) -> Result<Self> {
        let tables = Arc::new(FftTables::new(buffer_size)?);
        Self::with_tables(tables, sample_rate)
    }

    /// Create an engine on top of existing tables
    pub fn with_tables(tables: Arc<FftTables>, sample_rate: f64) -> Result<Self> {
        let size = tables.size();
        let context = TransformContext::new(size, sample_rate)?;

        debug!(size, sample_rate, bandwidth = context.bandwidth(), "created FFT engine");

        Ok(Self {
            tables,
            context,
            scratch_real: vec![0.0; size],
            scratch_imag: vec![0.0; size],
        })
    }

    /// New engine sharing this engine's tables, with its own buffers
    pub fn sibling(&self) -> Self {
        let size = self.tables.size();

        Self {
            tables: Arc::clone(&self.tables),
            context: self.context.cleared(),
            scratch_real: vec![0.0; size],
            scratch_imag: vec![0.0; size],
        }
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let expected = self.tables.size();
        if len != expected {
            return Err(DspError::SizeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    /// Forward transform (time → frequency)
    ///
    /// # Arguments
    /// * `buffer` - Exactly N time-domain samples
    ///
    /// # Returns
    /// Magnitude spectrum of length N/2
    pub fn forward(&mut self, buffer: &[f64]) -> Result<&[f64]> {
        self.check_len(buffer.len())?;

        let ctx = &mut self.context;
        for (i, &src) in self.tables.reverse_table().iter().enumerate() {
            ctx.real[i] = buffer[src];
        }
        ctx.imag.fill(0.0);

        self.tables.butterflies(&mut ctx.real, &mut ctx.imag);

        Ok(ctx.calculate_spectrum())
    }

    /// Inverse transform (frequency → time)
    ///
    /// Uses the context's own `real`/`imag` when an argument is `None`.
    /// Inputs are left untouched. The imaginary part of the result is
    /// discarded, so the original signal is assumed to be real-valued.
    ///
    /// # Returns
    /// New time-domain buffer of length N
    pub fn inverse(&mut self, real: Option<&[f64]>, imag: Option<&[f64]>) -> Result<Vec<f64>> {
        let real = real.unwrap_or(self.context.real.as_slice());
        let imag = imag.unwrap_or(self.context.imag.as_slice());
        self.check_len(real.len())?;
        self.check_len(imag.len())?;

        // Conjugate while permuting, then reuse the forward butterflies
        for (i, &src) in self.tables.reverse_table().iter().enumerate() {
            self.scratch_real[i] = real[src];
            self.scratch_imag[i] = -imag[src];
        }

        self.tables
            .butterflies(&mut self.scratch_real, &mut self.scratch_imag);

        let scale = 1.0 / self.tables.size() as f64;
        Ok(self.scratch_real.iter().map(|&x| x * scale).collect())
    }

    /// Magnitude spectrum of the last forward transform
    pub fn spectrum(&self) -> &[f64] {
        self.context.spectrum()
    }

    pub fn context(&self) -> &TransformContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut TransformContext {
        &mut self.context
    }

    pub fn tables(&self) -> &Arc<FftTables> {
        &self.tables
    }

    /// Block size N
    pub fn buffer_size(&self) -> usize {
        self.tables.size()
    }
}
