//! Python bindings for sample buffer utilities

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1, PyReadwriteArray1};
use crate::audio::{self, Channel};

/// Negate every sample in place
#[pyfunction]
#[pyo3(name = "invert")]
pub fn py_invert(mut buffer: PyReadwriteArray1<f64>) -> PyResult<()> {
    audio::invert(buffer.as_slice_mut()?);
    Ok(())
}

/// Interleave two mono channels into [l0, r0, l1, r1, ...]
#[pyfunction]
#[pyo3(name = "interleave")]
pub fn py_interleave<'py>(
    py: Python<'py>,
    left: PyReadonlyArray1<f64>,
    right: PyReadonlyArray1<f64>,
) -> PyResult<&'py PyArray1<f64>> {
    let stereo = audio::interleave(left.as_slice()?, right.as_slice()?)?;
    Ok(PyArray1::from_vec(py, stereo))
}

/// Extract one channel from an interleaved buffer
///
/// Args:
///     buffer: Interleaved samples (even length)
///     channel: "left", "right" or "mix"
#[pyfunction]
#[pyo3(name = "deinterleave", signature = (buffer, channel="mix"))]
pub fn py_deinterleave<'py>(
    py: Python<'py>,
    buffer: PyReadonlyArray1<f64>,
    channel: &str,
) -> PyResult<&'py PyArray1<f64>> {
    let channel: Channel = channel.parse()?;
    let mono = audio::deinterleave(channel, buffer.as_slice()?)?;
    Ok(PyArray1::from_vec(py, mono))
}

/// Mix two buffers: a + (±b) / volume_correction
#[pyfunction]
#[pyo3(name = "mix", signature = (a, b, negate=false, volume_correction=1.0))]
pub fn py_mix<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    negate: bool,
    volume_correction: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let mixed = audio::mix(a.as_slice()?, b.as_slice()?, negate, volume_correction)?;
    Ok(PyArray1::from_vec(py, mixed))
}

/// Root mean square level
#[pyfunction]
#[pyo3(name = "rms")]
pub fn py_rms(buffer: PyReadonlyArray1<f64>) -> PyResult<f64> {
    Ok(audio::rms(buffer.as_slice()?)?)
}

/// Absolute peak level (0.0 for an empty buffer)
#[pyfunction]
#[pyo3(name = "peak")]
pub fn py_peak(buffer: PyReadonlyArray1<f64>) -> PyResult<f64> {
    Ok(audio::peak(buffer.as_slice()?))
}
