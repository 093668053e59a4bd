use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("key mismatch: {what}")]
    KeyMismatch { what: String },

    #[error("parameters mismatch: {what}")]
    ParametersMismatch { what: String },

    #[error("degree mismatch: expected {expected}, got {actual}")]
    DegreeMismatch { expected: usize, actual: usize },

    #[error("unsupported degree {degree}, at most {max} is supported")]
    UnsupportedDegree { degree: usize, max: usize },

    #[error("no key available to realize rotation {rotation}")]
    UnsupportedRotation { rotation: String },

    #[error("encoding overflow: value {value} at index {index} does not fit plaintext modulus {modulus}")]
    EncodingOverflow { index: usize, value: i128, modulus: u64 },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("representation mismatch: operand is not in coefficient representation")]
    RepresentationMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn key_mismatch(what: impl Into<String>) -> Self {
        Error::KeyMismatch { what: what.into() }
    }

    pub(crate) fn parameters_mismatch(what: impl Into<String>) -> Self {
        Error::ParametersMismatch { what: what.into() }
    }
}
