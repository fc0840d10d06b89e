//! Error types for phone construction, IPA lookup and alignment input.

use thiserror::Error;

/// Errors raised by the phonetic core and its IPA table.
#[derive(Debug, Error)]
pub enum PhoneticError {
    /// A symbol (or the base character of a symbol cluster) is not in the IPA table.
    #[error("undefined IPA symbol {0:?}")]
    UnknownSymbol(String),

    /// An integer attribute code falls outside its category table.
    #[error("code {code} is out of range for feature `{feature}`")]
    InvalidAttribute { feature: &'static str, code: u8 },

    /// A category label does not name any member of its table.
    #[error("unknown label {label:?} for feature `{feature}`")]
    UnknownLabel { feature: &'static str, label: String },

    /// A table row or code slice has the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    WrongArity {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A code slice passed outside of table parsing has the wrong length.
    #[error("expected {expected} feature codes, found {found}")]
    CodeCount { expected: usize, found: usize },

    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Two sequences that must be aligned have different lengths.
    #[error("aligned sequences differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("feature matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PhoneticError {
    /// True for failures of the lookup class (the symbol is simply not known).
    pub fn is_lookup(&self) -> bool {
        matches!(self, PhoneticError::UnknownSymbol(_))
    }
}

/// A specialized `Result` type for the phonetic core.
pub type Result<T> = std::result::Result<T, PhoneticError>;
