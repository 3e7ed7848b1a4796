//! Error types for gravity direction input.

use std::fmt;

/// Reasons a vector cannot be used as a gravity direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionError {
    /// The vector has (near) zero length and no defined direction.
    Zero,
    /// The vector contains NaN or infinite components.
    NonFinite,
}

impl fmt::Display for DirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "direction has zero length"),
            Self::NonFinite => write!(f, "direction has non-finite components"),
        }
    }
}

impl std::error::Error for DirectionError {}

/// Result type for direction validation.
pub type DirectionResult<T> = Result<T, DirectionError>;
