use thiserror::Error;

/// Custom error type for the seqdiff engine.
///
/// Every variant describes a programming error: callers are expected to fix
/// the offending construction or call, not to retry it.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum SeqDiffError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Vector creation error: data length {data_len} does not match shape {shape:?}")]
    VectorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulationShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Misaligned sequences in {operation}: {reason}")]
    MisalignedSequences { operation: String, reason: String },

    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Cannot build a batch from an empty list")]
    EmptyBatch,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SeqDiffError {
    /// Shorthand for a one-dimensional length mismatch.
    pub(crate) fn length_mismatch(expected: usize, actual: usize, operation: &str) -> Self {
        SeqDiffError::ShapeMismatch {
            expected: vec![expected],
            actual: vec![actual],
            operation: operation.to_string(),
        }
    }
}
