//! Python bindings via PyO3.

use std::collections::BTreeSet;

use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::{PyLookupError, PyOSError, PyValueError};
use pyo3::prelude::*;

use crate::cognates::CognateDetector;
use crate::config::CognateConfig;
use crate::contexts::pair_features;
use crate::error::PhoneticError;
use crate::ipa::{clean_ipa, inventory, tokenize, IpaTable};
use crate::phone::Phone;
use crate::phonetic::{align, lev_distance};
use crate::types::{Alignment, WordPair};

impl From<PhoneticError> for PyErr {
    fn from(err: PhoneticError) -> Self {
        match err {
            PhoneticError::UnknownSymbol(_) => PyLookupError::new_err(err.to_string()),
            PhoneticError::Io(_) => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

// ============================================================================
// PHONETIC FUNCTIONS
// ============================================================================

/// Distance between two phones given as ten integer feature codes each.
#[pyfunction]
fn py_phone_distance_codes(codes_a: Vec<u8>, codes_b: Vec<u8>) -> PyResult<f64> {
    let a = Phone::from_code_slice(&codes_a)?;
    let b = Phone::from_code_slice(&codes_b)?;
    Ok(a.distance(&b))
}

#[pyfunction]
fn py_tokenize(ipa: &str) -> Vec<String> {
    tokenize(&clean_ipa(ipa))
}

/// Distinct symbol clusters across a list of transcriptions.
#[pyfunction]
fn py_inventory(words: Vec<&str>) -> BTreeSet<String> {
    inventory(words)
}

// ============================================================================
// PYTHON WRAPPER TYPES
// ============================================================================

#[pyclass(name = "IpaTable")]
struct PyIpaTable {
    inner: IpaTable,
}

#[pymethods]
impl PyIpaTable {
    #[staticmethod]
    fn bundled() -> PyResult<Self> {
        Ok(Self {
            inner: IpaTable::bundled()?,
        })
    }

    #[staticmethod]
    fn from_path(path: &str) -> PyResult<Self> {
        Ok(Self {
            inner: IpaTable::from_path(path)?,
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, symbol: &str) -> bool {
        self.inner.contains(symbol)
    }

    fn tokenize(&self, ipa: &str) -> Vec<String> {
        py_tokenize(ipa)
    }

    fn phone_distance(&self, symbol_a: &str, symbol_b: &str) -> PyResult<f64> {
        let a = self.inner.to_phone(symbol_a)?;
        let b = self.inner.to_phone(symbol_b)?;
        Ok(a.distance(&b))
    }

    fn align(&self, ipa_a: &str, ipa_b: &str) -> PyResult<PyAlignment> {
        let alignment = align(&self.inner.word(ipa_a)?, &self.inner.word(ipa_b)?);
        Ok(PyAlignment::new(&self.inner, alignment))
    }

    /// Normalized edit distance, over the aligned words unless `aligned` is false.
    #[pyo3(signature = (ipa_a, ipa_b, aligned = true))]
    fn lev_distance(&self, ipa_a: &str, ipa_b: &str, aligned: bool) -> PyResult<f64> {
        let a = self.inner.word(ipa_a)?;
        let b = self.inner.word(ipa_b)?;
        if aligned {
            let alignment = align(&a, &b);
            Ok(lev_distance(&alignment.source, &alignment.target))
        } else {
            Ok(lev_distance(&a, &b))
        }
    }

    /// Classify `(concept_id, word_a, word_b)` rows.
    ///
    /// Returns `(concept_id, aligned_a, aligned_b, distance, is_cognate)` per row.
    #[pyo3(signature = (rows, threshold = None))]
    fn classify(
        &self,
        rows: Vec<(u32, String, String)>,
        threshold: Option<f64>,
    ) -> PyResult<Vec<(u32, Vec<String>, Vec<String>, f64, bool)>> {
        let mut config = CognateConfig::default();
        if let Some(threshold) = threshold {
            config.threshold = threshold;
        }
        let detector = CognateDetector::new(&self.inner, config);

        let pairs: Vec<WordPair> = rows
            .into_iter()
            .map(|(id, a, b)| WordPair::new(id, a, b))
            .collect();

        pairs
            .iter()
            .map(|pair| -> PyResult<_> {
                let assessed = detector.assess(pair)?;
                let is_cognate = detector.is_cognate(&assessed);
                Ok((
                    assessed.concept_id,
                    self.inner.render(&assessed.alignment.source),
                    self.inner.render(&assessed.alignment.target),
                    assessed.distance.0,
                    is_cognate,
                ))
            })
            .collect()
    }

    /// Context feature matrix of the aligned pair as an int32 array.
    fn context_features<'py>(
        &self,
        py: Python<'py>,
        ipa_a: &str,
        ipa_b: &str,
    ) -> PyResult<&'py PyArray2<i32>> {
        let alignment = align(&self.inner.word(ipa_a)?, &self.inner.word(ipa_b)?);
        let features = pair_features(&alignment.source, &alignment.target)?;
        Ok(features.into_pyarray(py))
    }
}

#[pyclass(name = "Alignment")]
struct PyAlignment {
    #[pyo3(get)]
    sequence_a: Vec<String>,
    #[pyo3(get)]
    sequence_b: Vec<String>,
    #[pyo3(get)]
    operations: Vec<String>,
    #[pyo3(get)]
    score: f64,
}

impl PyAlignment {
    fn new(table: &IpaTable, alignment: Alignment) -> Self {
        Self {
            sequence_a: table.render(&alignment.source),
            sequence_b: table.render(&alignment.target),
            operations: alignment
                .operations
                .iter()
                .map(|op| format!("{op:?}").to_lowercase())
                .collect(),
            score: alignment.score,
        }
    }
}

#[pymethods]
impl PyAlignment {
    fn __len__(&self) -> usize {
        self.sequence_a.len()
    }

    fn correspondences(&self) -> Vec<(String, String)> {
        self.operations
            .iter()
            .zip(self.sequence_a.iter().zip(&self.sequence_b))
            .filter(|(op, _)| op.as_str() == "substitute")
            .map(|(_, (a, b))| (a.clone(), b.clone()))
            .collect()
    }
}

// ============================================================================
// MODULE DEFINITION
// ============================================================================

#[pymodule]
fn cognate_core(_py: Python, m: &PyModule) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(py_phone_distance_codes, m)?)?;
    m.add_function(wrap_pyfunction!(py_tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(py_inventory, m)?)?;

    m.add_class::<PyIpaTable>()?;
    m.add_class::<PyAlignment>()?;

    Ok(())
}
