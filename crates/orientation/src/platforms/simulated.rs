//! Simulated platform - synthetic tilt sweep for desktop runs

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{AccessOutcome, OrientationPlatform, OrientationSample};

/// Sweep shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Compass heading advance per reading (degrees)
    pub alpha_step: f64,
    /// Front-back tilt amplitude (degrees)
    pub beta_amplitude: f64,
    /// Left-right tilt amplitude (degrees)
    pub gamma_amplitude: f64,
    /// Readings per full tilt cycle
    pub cycle_len: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            alpha_step: 1.0,
            beta_amplitude: 30.0,
            gamma_amplitude: 20.0,
            cycle_len: 200,
        }
    }
}

/// Deterministic orientation generator
///
/// Reading `n`:
/// - alpha = `n * alpha_step` wrapped into [0, 360)
/// - beta  = `beta_amplitude * sin(2πn / cycle_len)`
/// - gamma = `gamma_amplitude * cos(2πn / cycle_len)`
#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    config: SweepConfig,
    reads: AtomicU64,
}

impl SimulatedPlatform {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            reads: AtomicU64::new(0),
        }
    }

    /// Reading at index `n` without advancing the sweep
    pub fn reading_at(&self, n: u64) -> OrientationSample {
        let cycle = f64::from(self.config.cycle_len.max(1));
        let phase = TAU * (n as f64) / cycle;
        OrientationSample::new(
            ((n as f64) * self.config.alpha_step).rem_euclid(360.0),
            self.config.beta_amplitude * phase.sin(),
            self.config.gamma_amplitude * phase.cos(),
        )
    }
}

impl OrientationPlatform for SimulatedPlatform {
    fn name(&self) -> &str {
        "simulated"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn requires_permission(&self) -> bool {
        false
    }

    fn request_permission(&self) -> AccessOutcome {
        AccessOutcome::Granted
    }

    fn try_read(&self) -> Option<OrientationSample> {
        let n = self.reads.fetch_add(1, Ordering::Relaxed);
        Some(self.reading_at(n))
    }
}
