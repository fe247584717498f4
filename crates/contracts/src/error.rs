//! Layered error definitions
//!
//! Categorized by source: config / endpoint / transport / wire

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Endpoint Errors =====
    /// Endpoint string is not `host:port`
    #[error("invalid endpoint '{input}': {message}")]
    InvalidEndpoint { input: String, message: String },

    // ===== Transport Errors =====
    /// Duplex channel could not be opened
    #[error("transport connect error for '{endpoint}': {message}")]
    TransportConnect { endpoint: String, message: String },

    /// Frame could not be handed to the transport
    #[error("transport send error: {message}")]
    TransportSend { message: String },

    // ===== Wire Errors =====
    /// Message could not be encoded
    #[error("wire encode error: {0}")]
    WireEncode(#[from] serde_json::Error),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create endpoint parse error
    pub fn invalid_endpoint(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create transport connect error
    pub fn transport_connect(endpoint: impl ToString, message: impl Into<String>) -> Self {
        Self::TransportConnect {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}
