//! ControllerConfig - Config Loader output
//!
//! Describes one controller session: server endpoint, player name, sampling
//! cadence, smoothing, and reconnection policy. Every field has a default so
//! an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{Endpoint, PlayerIdentity};

/// Complete controller configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ControllerConfig {
    /// Game server connection
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Player identity
    #[serde(default)]
    #[validate(nested)]
    pub player: PlayerConfig,

    /// Orientation sampling
    #[serde(default)]
    #[validate(nested)]
    pub sampling: SamplingConfig,

    /// Signal conditioning
    #[serde(default)]
    #[validate(nested)]
    pub conditioning: ConditioningConfig,

    /// Reconnection policy
    #[serde(default)]
    #[validate(nested)]
    pub retry: RetryConfig,
}

impl ControllerConfig {
    /// Identity derived from `player.name`, falling back to the default name
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity::from_optional(self.player.name.as_deref())
    }
}

/// Server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// `host:port` of the game server
    #[serde(default)]
    pub endpoint: Endpoint,
}

/// Player configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlayerConfig {
    /// Display name (None = default name)
    #[serde(default)]
    #[validate(length(max = 64))]
    pub name: Option<String>,
}

/// Sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SamplingConfig {
    /// Sampling period in milliseconds
    #[serde(default = "default_period_ms")]
    #[validate(range(min = 1, max = 10_000))]
    pub period_ms: u64,

    /// Sample channel capacity (newest sample dropped when full)
    #[serde(default = "default_channel_capacity")]
    #[validate(range(min = 1, max = 65_536))]
    pub channel_capacity: usize,
}

fn default_period_ms() -> u64 {
    50
}

fn default_channel_capacity() -> usize {
    16
}

impl SamplingConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Signal conditioning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConditioningConfig {
    /// Exponential smoothing factor k, in (0, 1); smaller = smoother, more lag
    #[serde(default = "default_smoothing_factor")]
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub smoothing_factor: f64,
}

fn default_smoothing_factor() -> f64 {
    0.1
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: default_smoothing_factor(),
        }
    }
}

/// Reconnection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RetryConfig {
    /// Reconnection attempts after the first failure before giving up
    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1, max = 100))]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    #[validate(range(max = 600_000))]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    2000
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}
