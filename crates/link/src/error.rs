//! Link error types

use contracts::ContractError;
use thiserror::Error;

/// Link specific error
#[derive(Debug, Error)]
pub enum LinkError {
    /// Retry budget spent without a connection
    #[error("could not connect after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    /// Nothing is connecting (never started, or shut down)
    #[error("link is idle")]
    Idle,

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, LinkError>;
