//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// These are invariant violations of the numeric core, not recoverable
/// runtime faults: a failed `learn()` step leaves the parameters as they
/// were and the caller decides whether to skip, stop or roll back.
#[derive(Error, Debug)]
pub enum DiscorError {
    /// Batch tensors have inconsistent shapes.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An importance weight does not match the shape of its value estimate.
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    /// A loss became non-finite before the parameter update was applied.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
