//! Error types for Satyadrishti

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Satyadrishti operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dimensions: {bands} bands of {rows}x{cols}")]
    InvalidDimensions {
        bands: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Covariance of {bands} bands is not invertible even with ridge {ridge:e}")]
    SingularCovariance { bands: usize, ridge: f64 },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown algorithm: {0} (expected simple, rx or both)")]
    UnknownAlgorithm(String),

    #[error("Missing input: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error rejects the invocation before any computation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. } | Error::UnknownAlgorithm(_))
    }
}

/// Result type alias for Satyadrishti operations
pub type Result<T> = std::result::Result<T, Error>;
