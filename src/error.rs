//! Error types for the Dynamic Relaxation solver

use thiserror::Error;

/// Main error type for DR operations
#[derive(Error, Debug)]
pub enum DrError {
    #[error("field '{field}' has length {actual}, expected {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("edge {edge} is invalid: {detail}")]
    BadEdge { edge: usize, detail: String },

    #[error("invalid option: {0}")]
    BadOptions(String),

    #[error("vertex {vertex} has zero or negative lumped mass at iteration {iteration}")]
    DegenerateMass { vertex: usize, iteration: usize },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for DR operations
pub type DrResult<T> = Result<T, DrError>;
