//! Python bindings for the registry policy parser using PyO3.
//!
//! This module provides Python-friendly wrappers around the core Rust types.
//! `RegistryPolicy` behaves like a read-only list of `RegistryPolicyEntry`.

use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use std::sync::Arc;

use crate::FormatError;
use crate::{Entry as RustEntry, Policy as RustPolicy, ValueData as RustValueData};

/// Convert Rust FormatError to Python exception
fn format_error_to_py(err: FormatError) -> PyErr {
    match err {
        FormatError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Python wrapper for a policy entry
#[pyclass(name = "RegistryPolicyEntry")]
#[derive(Clone)]
pub struct PyEntry {
    inner: RustEntry,
}

#[pymethods]
impl PyEntry {
    /// Get the registry key path
    #[getter]
    fn key(&self) -> String {
        self.inner.key.clone()
    }

    /// Get the value name
    #[getter]
    fn value(&self) -> String {
        self.inner.value.clone()
    }

    /// Get the value type name (e.g. "REG_SZ")
    #[getter]
    fn r#type(&self) -> &'static str {
        self.inner.value_type.name()
    }

    /// Get the numeric value type code
    #[getter]
    fn type_code(&self) -> u32 {
        self.inner.value_type.code()
    }

    /// Get the declared data size in bytes
    #[getter]
    fn size(&self) -> u32 {
        self.inner.size
    }

    /// Get the decoded data as str, bytes, int or list of str
    #[getter]
    fn data(&self, py: Python<'_>) -> PyObject {
        match &self.inner.data {
            RustValueData::String(s) | RustValueData::ExpandString(s) | RustValueData::Link(s) => {
                s.to_object(py)
            }
            RustValueData::Binary(b) => PyBytes::new(py, b).into(),
            RustValueData::Dword(d) | RustValueData::DwordBigEndian(d) => d.to_object(py),
            RustValueData::MultiString(strings) => strings.to_object(py),
            RustValueData::Qword(q) => q.to_object(py),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RegistryPolicyEntry(key={:?}, value={:?}, type={}, size={})",
            self.inner.key,
            self.inner.value,
            self.inner.value_type.name(),
            self.inner.size
        )
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Python wrapper for a decoded policy file
#[pyclass(name = "RegistryPolicy")]
pub struct PyPolicy {
    inner: Arc<RustPolicy>,
}

#[pymethods]
impl PyPolicy {
    /// Open and decode a registry policy file
    #[staticmethod]
    fn parse(path: &str, py: Python) -> PyResult<PyPolicy> {
        // Release GIL during file I/O and parsing
        let policy = py
            .allow_threads(|| RustPolicy::open(path))
            .map_err(format_error_to_py)?;

        Ok(PyPolicy {
            inner: Arc::new(policy),
        })
    }

    /// Decode a registry policy from bytes
    #[staticmethod]
    fn from_bytes(data: &[u8]) -> PyResult<PyPolicy> {
        let policy = RustPolicy::parse(data).map_err(format_error_to_py)?;

        Ok(PyPolicy {
            inner: Arc::new(policy),
        })
    }

    /// Get the header signature
    #[getter]
    fn signature(&self) -> u32 {
        self.inner.signature()
    }

    /// Get the header version
    #[getter]
    fn version(&self) -> u32 {
        self.inner.version()
    }

    /// Get all entries in file order
    fn entries(&self) -> Vec<PyEntry> {
        self.inner
            .iter()
            .map(|entry| PyEntry {
                inner: entry.clone(),
            })
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __getitem__(&self, index: isize) -> PyResult<PyEntry> {
        let len = self.inner.len() as isize;
        let resolved = if index < 0 { index + len } else { index };

        usize::try_from(resolved)
            .ok()
            .and_then(|i| self.inner.get(i))
            .map(|entry| PyEntry {
                inner: entry.clone(),
            })
            .ok_or_else(|| PyIndexError::new_err("policy entry index out of range"))
    }

    fn __repr__(&self) -> String {
        format!(
            "RegistryPolicy(signature={:#010x}, version={}, entries={})",
            self.inner.signature(),
            self.inner.version(),
            self.inner.len()
        )
    }
}

/// Python module definition
#[pymodule]
fn reg_pol(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyPolicy>()?;
    m.add_class::<PyEntry>()?;

    // Add version constant
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
