//! Publisher metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts of published control messages
#[derive(Debug, Default)]
pub struct PublisherMetrics {
    /// Messages accepted by the sink
    forwarded: AtomicU64,
    /// Messages the sink dropped (not connected)
    dropped: AtomicU64,
}

impl PublisherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    pub fn inc_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn inc_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> PublisherSnapshot {
        PublisherSnapshot {
            forwarded: self.forwarded(),
            dropped: self.dropped(),
        }
    }
}

/// Snapshot of publisher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherSnapshot {
    pub forwarded: u64,
    pub dropped: u64,
}

impl PublisherSnapshot {
    pub fn total(&self) -> u64 {
        self.forwarded + self.dropped
    }
}
