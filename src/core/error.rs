//! Error type shared by the normalization core.

use thiserror::Error;

/// Errors raised while building or applying a point cloud transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Malformed shape, non-finite values or an unrecognized laterality.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Zero spatial extent or zero density range, the transform is undefined.
    #[error("degenerate point cloud: {0}")]
    DegenerateCloud(String),

    /// A range remap was asked to map from a zero-width source interval.
    #[error("division by zero: source interval ({start}, {end}) has zero width")]
    DivisionByZero { start: f64, end: f64 },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
