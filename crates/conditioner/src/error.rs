//! Conditioner error types

use thiserror::Error;

/// Conditioner error
#[derive(Debug, Error, PartialEq)]
pub enum ConditionerError {
    /// Smoothing factor outside the open interval (0, 1)
    #[error("smoothing factor must be in (0, 1), got {factor}")]
    InvalidSmoothingFactor {
        /// Rejected factor
        factor: f64,
    },
}

/// Conditioner Result alias
pub type Result<T> = std::result::Result<T, ConditionerError>;
