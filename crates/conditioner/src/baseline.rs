//! Baseline storage shared between the sampling task and calibration callers.
//!
//! Baseline, calibration generation, and the latest raw sample live behind a
//! single `RwLock`. Readers always copy the whole baseline in one critical
//! section, so a concurrent calibration is seen entirely or not at all.

use std::sync::{Arc, PoisonError, RwLock};

use contracts::{Baseline, OrientationSample};
use tracing::info;

/// Snapshot handed to `transform`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Calibration {
    pub baseline: Baseline,
    /// Incremented on every calibration
    pub generation: u64,
}

#[derive(Debug, Default)]
struct CellState {
    calibration: Calibration,
    latest_raw: Option<OrientationSample>,
}

#[derive(Debug, Default)]
pub(crate) struct BaselineCell {
    state: RwLock<CellState>,
}

impl BaselineCell {
    /// Record the raw sample about to be transformed and snapshot the calibration
    pub fn observe(&self, raw: &OrientationSample) -> Calibration {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.latest_raw = Some(*raw);
        state.calibration
    }

    /// Replace the baseline wholesale
    pub fn replace(&self, sample: &OrientationSample) -> Calibration {
        let baseline = Baseline::capture(sample);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.calibration = Calibration {
            baseline,
            generation: state.calibration.generation + 1,
        };
        state.calibration
    }

    /// Replace the baseline from the latest observed raw sample
    pub fn replace_with_latest(&self) -> Calibration {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let sample = state.latest_raw.unwrap_or_default();
        state.calibration = Calibration {
            baseline: Baseline::capture(&sample),
            generation: state.calibration.generation + 1,
        };
        state.calibration
    }

    pub fn snapshot(&self) -> Calibration {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calibration
    }
}

/// Cloneable calibration trigger
///
/// Lets a UI or command task calibrate while the sampling task owns the
/// [`SignalConditioner`](crate::SignalConditioner). The conditioner notices the
/// new generation on its next tick and restarts smoothing from the identity.
#[derive(Debug, Clone)]
pub struct CalibrationHandle {
    cell: Arc<BaselineCell>,
}

impl CalibrationHandle {
    pub(crate) fn new(cell: Arc<BaselineCell>) -> Self {
        Self { cell }
    }

    /// Capture `sample` as the new baseline (absent axes become 0.0)
    pub fn calibrate(&self, sample: &OrientationSample) -> Baseline {
        let calibration = self.cell.replace(sample);
        log_calibration(&calibration);
        calibration.baseline
    }

    /// Capture the most recent raw sample as the new baseline
    ///
    /// Before any sample has been seen this sets a zero baseline.
    pub fn calibrate_latest(&self) -> Baseline {
        let calibration = self.cell.replace_with_latest();
        log_calibration(&calibration);
        calibration.baseline
    }

    /// Current baseline
    pub fn baseline(&self) -> Baseline {
        self.cell.snapshot().baseline
    }

    /// Number of calibrations performed this session
    pub fn generation(&self) -> u64 {
        self.cell.snapshot().generation
    }
}

fn log_calibration(calibration: &Calibration) {
    metrics::counter!("gyro_pad_calibrations_total").increment(1);
    info!(
        alpha = calibration.baseline.alpha,
        beta = calibration.baseline.beta,
        gamma = calibration.baseline.gamma,
        generation = calibration.generation,
        "Baseline calibrated"
    );
}
