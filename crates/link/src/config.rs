//! Link configuration

use std::time::Duration;

use contracts::{ControllerConfig, Endpoint};

/// Connection manager settings
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    /// Game server endpoint
    pub endpoint: Endpoint,
    /// Reconnection attempts after the first failure before giving up
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            max_attempts: 5,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&ControllerConfig> for LinkConfig {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            endpoint: config.server.endpoint.clone(),
            max_attempts: config.retry.max_attempts,
            retry_delay: config.retry.delay(),
        }
    }
}
