//! Orientation error types

use thiserror::Error;

/// Orientation source error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrientationError {
    /// User refused the motion-sensor permission prompt
    #[error("orientation permission denied by user")]
    PermissionDenied,

    /// Platform exposes no orientation sensor
    #[error("orientation sensor not supported on platform '{platform}'")]
    UnsupportedPlatform {
        /// Platform name
        platform: String,
    },
}

/// Orientation Result alias
pub type Result<T> = std::result::Result<T, OrientationError>;
