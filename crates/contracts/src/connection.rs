//! Connection lifecycle contracts
//!
//! Owned and mutated only by the connection manager; everyone else observes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Duplex-channel lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No channel, nothing scheduled
    #[default]
    Disconnected,
    /// Attempt in flight or reconnection scheduled
    Connecting,
    /// Channel open, messages flow
    Connected,
    /// Retry budget spent; only an explicit connect recovers
    Failed,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of a spent retry budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Schedule another attempt; carries the new attempt number
    Retry(u32),
    /// Budget spent
    GiveUp,
}

/// Bounded count of automatic reconnection attempts
///
/// `max` counts retries after the first failure, so a budget of `max` allows
/// `max + 1` connection attempts in total. Invariant: `attempt <= max`; a
/// failure recorded with `attempt == max` ends automatic recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempt: u32,
    max: u32,
}

impl RetryBudget {
    pub fn new(max: u32) -> Self {
        Self { attempt: 0, max }
    }

    /// Retries scheduled since the last reset
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max
    }

    /// Connection attempts made since the last reset, the initial one included
    pub fn attempts_made(&self) -> u32 {
        self.attempt.saturating_add(1)
    }

    /// Record one failed attempt and decide what happens next
    pub fn record_failure(&mut self) -> RetryDecision {
        if self.attempt < self.max {
            self.attempt += 1;
            RetryDecision::Retry(self.attempt)
        } else {
            RetryDecision::GiveUp
        }
    }

    /// Reset after a successful connection or an explicit connect
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
