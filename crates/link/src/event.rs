//! Connection lifecycle events

use std::fmt;

/// Observable connection event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Channel open and registration sent
    Connected,
    /// Attempt failed or channel lost; another attempt is scheduled
    Retrying {
        attempt: u32,
        max: u32,
        reason: String,
    },
    /// Retry budget spent; no further attempts
    Failed { attempts: u32 },
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::Connected => f.write_str("connected"),
            LinkEvent::Retrying {
                attempt,
                max,
                reason,
            } => write!(f, "retrying ({attempt}/{max}): {reason}"),
            LinkEvent::Failed { attempts } => {
                write!(f, "could not connect after {attempts} attempts")
            }
        }
    }
}
