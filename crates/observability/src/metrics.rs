//! Controller metrics
//!
//! Thin `metrics` facade calls plus an in-memory aggregator for the summary
//! printed when a run ends.

use std::fmt;

use contracts::{Axis, ConditionedSample, ConnectionState};
use metrics::{counter, gauge, histogram};

/// Record one conditioning + publishing tick
///
/// # Example
///
/// ```ignore
/// let conditioned = conditioner.transform(&raw);
/// let delivered = publisher.publish(&conditioned);
/// record_control_tick(&conditioned, delivered, started.elapsed().as_secs_f64() * 1000.0);
/// ```
pub fn record_control_tick(sample: &ConditionedSample, delivered: bool, latency_ms: f64) {
    counter!("gyro_pad_ticks_total").increment(1);
    histogram!("gyro_pad_tick_latency_ms").record(latency_ms);

    for axis in Axis::ALL {
        match sample.axis(axis) {
            Some(value) => gauge!("gyro_pad_axis_degrees", "axis" => axis.as_str()).set(value),
            None => counter!("gyro_pad_axis_absent_total", "axis" => axis.as_str()).increment(1),
        }
    }

    if !delivered {
        counter!("gyro_pad_ticks_undelivered_total").increment(1);
    }
}

/// Record the current connection state as a numeric gauge
///
/// 0 = disconnected, 1 = connecting, 2 = connected, 3 = failed
pub fn record_connection_state(state: ConnectionState) {
    let value = match state {
        ConnectionState::Disconnected => 0.0,
        ConnectionState::Connecting => 1.0,
        ConnectionState::Connected => 2.0,
        ConnectionState::Failed => 3.0,
    };
    gauge!("gyro_pad_connection_state").set(value);
}

/// Record a ready message
pub fn record_ready(delivered: bool) {
    let status = if delivered { "sent" } else { "dropped" };
    counter!("gyro_pad_ready_total", "status" => status).increment(1);
}

/// Record a user-triggered calibration
pub fn record_calibration() {
    counter!("gyro_pad_user_calibrations_total").increment(1);
}

/// Per-run control statistics
#[derive(Debug, Clone, Default)]
pub struct ControlStats {
    pub ticks: u64,
    pub delivered: u64,
    pub undelivered: u64,
    pub calibrations: u64,
    pub reconnects: u64,
    /// Conditioned values, in [`Axis::ALL`] order
    pub axes: [RunningStats; 3],
    /// Absent readings, in [`Axis::ALL`] order
    pub absent: [u64; 3],
    pub latency_ms: RunningStats,
}

impl ControlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self, sample: &ConditionedSample, delivered: bool, latency_ms: f64) {
        self.ticks += 1;
        if delivered {
            self.delivered += 1;
        } else {
            self.undelivered += 1;
        }

        for (idx, axis) in Axis::ALL.into_iter().enumerate() {
            match sample.axis(axis) {
                Some(value) => self.axes[idx].push(value),
                None => self.absent[idx] += 1,
            }
        }
        self.latency_ms.push(latency_ms);
    }

    pub fn record_calibration(&mut self) {
        self.calibrations += 1;
    }

    pub fn record_reconnect(&mut self) {
        self.reconnects += 1;
    }

    pub fn summary(&self) -> ControlSummary {
        ControlSummary {
            ticks: self.ticks,
            delivered: self.delivered,
            undelivered: self.undelivered,
            delivery_rate: if self.ticks > 0 {
                self.delivered as f64 / self.ticks as f64 * 100.0
            } else {
                0.0
            },
            calibrations: self.calibrations,
            reconnects: self.reconnects,
            axes: self.axes.each_ref().map(StatsSummary::from),
            absent: self.absent,
            latency_ms: StatsSummary::from(&self.latency_ms),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot of [`ControlStats`]
#[derive(Debug, Clone, Default)]
pub struct ControlSummary {
    pub ticks: u64,
    pub delivered: u64,
    pub undelivered: u64,
    /// Percentage of ticks whose controls message reached the transport
    pub delivery_rate: f64,
    pub calibrations: u64,
    pub reconnects: u64,
    pub axes: [StatsSummary; 3],
    pub absent: [u64; 3],
    pub latency_ms: StatsSummary,
}

impl fmt::Display for ControlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Control Summary ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(
            f,
            "Delivered: {} ({:.2}%), dropped: {}",
            self.delivered, self.delivery_rate, self.undelivered
        )?;
        writeln!(f, "Calibrations: {}", self.calibrations)?;
        writeln!(f, "Reconnects: {}", self.reconnects)?;
        for (idx, axis) in Axis::ALL.into_iter().enumerate() {
            writeln!(
                f,
                "{:<5} (deg): {} [absent {}]",
                axis.as_str(),
                self.axes[idx],
                self.absent[idx]
            )?;
        }
        writeln!(f, "Tick latency (ms): {}", self.latency_ms)
    }
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return f.write_str("N/A");
        }
        write!(
            f,
            "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
            self.min, self.max, self.mean, self.std_dev, self.count
        )
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance (n - 1)
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
