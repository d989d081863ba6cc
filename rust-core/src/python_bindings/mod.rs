//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use crate::error::DspError;

mod buffer_bindings;
mod spectrum_bindings;

impl From<DspError> for PyErr {
    fn from(err: DspError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn spectral_meter(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PyFftEngine>()?;
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;

    // Add WindowType enum
    m.add_class::<spectrum_bindings::PyWindowType>()?;

    m.add_function(wrap_pyfunction!(buffer_bindings::py_invert, m)?)?;
    m.add_function(wrap_pyfunction!(buffer_bindings::py_interleave, m)?)?;
    m.add_function(wrap_pyfunction!(buffer_bindings::py_deinterleave, m)?)?;
    m.add_function(wrap_pyfunction!(buffer_bindings::py_mix, m)?)?;
    m.add_function(wrap_pyfunction!(buffer_bindings::py_rms, m)?)?;
    m.add_function(wrap_pyfunction!(buffer_bindings::py_peak, m)?)?;

    Ok(())
}
