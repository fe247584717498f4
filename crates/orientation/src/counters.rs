//! Sampler counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Sampler metrics
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    /// Interval ticks fired
    pub ticks: AtomicU64,

    /// Samples handed to the stream
    pub samples_emitted: AtomicU64,

    /// Ticks with no reading available
    pub ticks_skipped: AtomicU64,

    /// Samples dropped because the stream was full
    pub samples_dropped: AtomicU64,
}

impl SamplerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_emitted(&self) {
        self.samples_emitted.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("gyro_pad_samples_total", "outcome" => "emitted").increment(1);
    }

    pub fn record_skipped(&self) {
        self.ticks_skipped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("gyro_pad_samples_total", "outcome" => "skipped").increment(1);
    }

    pub fn record_dropped(&self) {
        self.samples_dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("gyro_pad_samples_total", "outcome" => "dropped").increment(1);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> SamplerSnapshot {
        SamplerSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            samples_emitted: self.samples_emitted.load(Ordering::Relaxed),
            ticks_skipped: self.ticks_skipped.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SamplerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerSnapshot {
    pub ticks: u64,
    pub samples_emitted: u64,
    pub ticks_skipped: u64,
    pub samples_dropped: u64,
}
