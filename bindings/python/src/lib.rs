use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Inputs at least this large are split across the rayon pool.
const PARALLEL_THRESHOLD: usize = 1 << 20;

/// Convert a `Base91Error` into a Python `ValueError`.
fn to_py_err(e: base91_core::Base91Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Encode binary data as base91 text.
///
/// Args:
///     data: The bytes to encode.
///
/// Returns:
///     The base91 text (ASCII only, no backslash).
#[pyfunction]
fn encode(py: Python<'_>, data: &[u8]) -> PyResult<String> {
    let text = py.allow_threads(|| {
        if data.len() >= PARALLEL_THRESHOLD {
            base91_core::encode_parallel(data)
        } else {
            base91_core::encode_to_vec(data)
        }
    });
    let text = text.map_err(to_py_err)?;
    String::from_utf8(text).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Decode base91 text back into bytes.
///
/// Args:
///     text: The base91 text to decode.
///
/// Returns:
///     The decoded bytes.
///
/// Raises:
///     ValueError: If the text has an impossible length or a byte outside
///         the base91 alphabet.
#[pyfunction]
fn decode(py: Python<'_>, text: &str) -> PyResult<Py<PyBytes>> {
    let bytes = text.as_bytes();
    let data = py
        .allow_threads(|| {
            if bytes.len() >= PARALLEL_THRESHOLD {
                base91_core::decode_parallel(bytes)
            } else {
                base91_core::decode_to_vec(bytes)
            }
        })
        .map_err(to_py_err)?;
    Ok(PyBytes::new(py, &data).into())
}

/// Number of symbols produced by encoding `length` bytes.
///
/// Raises:
///     ValueError: If `length` is negative or above the maximum encode length.
#[pyfunction]
fn encoded_length(length: i64) -> PyResult<usize> {
    let length = base91_core::checked_length(length).map_err(to_py_err)?;
    base91_core::encoded_length(length).map_err(to_py_err)
}

/// Number of bytes recovered from `length` symbols, or None if no encoder
/// output has that length.
///
/// Raises:
///     ValueError: If `length` is negative.
#[pyfunction]
fn decoded_length(length: i64) -> PyResult<Option<usize>> {
    let length = base91_core::checked_length(length).map_err(to_py_err)?;
    Ok(base91_core::decoded_length(length))
}

/// Whether `text` is decodable base91 (valid length and alphabet).
#[pyfunction]
fn is_valid(text: &str) -> bool {
    base91_core::is_valid_text(text.as_bytes())
}

/// Name of the vector tier selected on this machine.
#[pyfunction]
fn simd_tier() -> String {
    base91_core::Tier::detect().to_string()
}

/// High-performance base91 encoding and decoding (Rust-powered).
#[pymodule]
fn base91(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(encoded_length, m)?)?;
    m.add_function(wrap_pyfunction!(decoded_length, m)?)?;
    m.add_function(wrap_pyfunction!(is_valid, m)?)?;
    m.add_function(wrap_pyfunction!(simd_tier, m)?)?;
    m.add("MAX_ENCODE_LENGTH", base91_core::MAX_ENCODE_LENGTH)?;
    Ok(())
}
