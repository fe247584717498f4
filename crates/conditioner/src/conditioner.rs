//! SignalConditioner - baseline subtraction + smoothing

use std::sync::Arc;

use contracts::{
    Axis, Baseline, ConditionedSample, ConditioningConfig, OrientationSample,
};
use tracing::{debug, instrument, trace};

use crate::baseline::{BaselineCell, CalibrationHandle};
use crate::filter::AxisSmoother;
use crate::Result;

/// Per-axis last smoothed values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothingState {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

/// Signal conditioner
///
/// Owns the smoothing state exclusively. The baseline is shared with any
/// [`CalibrationHandle`] created from this conditioner.
///
/// Deterministic: the same raw sequence and calibration history always
/// yields the same output sequence.
#[derive(Debug)]
pub struct SignalConditioner {
    /// Smoothers in [`Axis::ALL`] order
    smoothers: [AxisSmoother; 3],
    /// Shared baseline storage
    cell: Arc<BaselineCell>,
    /// Calibration generation the smoothers were last aligned with
    seen_generation: u64,
    /// Samples transformed
    ticks: u64,
}

impl SignalConditioner {
    /// Create a conditioner with smoothing factor `k` in (0, 1)
    pub fn new(smoothing_factor: f64) -> Result<Self> {
        let smoother = AxisSmoother::new(smoothing_factor)?;
        Ok(Self {
            smoothers: [smoother; 3],
            cell: Arc::new(BaselineCell::default()),
            seen_generation: 0,
            ticks: 0,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &ConditioningConfig) -> Result<Self> {
        Self::new(config.smoothing_factor)
    }

    /// Handle for calibrating from another task
    pub fn calibration_handle(&self) -> CalibrationHandle {
        CalibrationHandle::new(Arc::clone(&self.cell))
    }

    /// Capture `sample` as the new baseline and restart smoothing
    pub fn calibrate(&mut self, sample: &OrientationSample) -> Baseline {
        let baseline = self.calibration_handle().calibrate(sample);
        self.align_generation();
        baseline
    }

    /// Capture the most recent transformed raw sample as the new baseline
    pub fn calibrate_latest(&mut self) -> Baseline {
        let baseline = self.calibration_handle().calibrate_latest();
        self.align_generation();
        baseline
    }

    /// Current baseline
    pub fn baseline(&self) -> Baseline {
        self.cell.snapshot().baseline
    }

    /// Current smoothing state
    pub fn smoothing_state(&self) -> SmoothingState {
        let [alpha, beta, gamma] = self.smoothers.map(|s| s.last());
        SmoothingState { alpha, beta, gamma }
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothers[0].factor()
    }

    /// Samples transformed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clear smoothing history, keep the baseline
    pub fn reset(&mut self) {
        for smoother in &mut self.smoothers {
            smoother.reset();
        }
        debug!("Smoothing state reset");
    }

    /// Condition one raw sample
    ///
    /// Per axis: absent stays absent and leaves that axis's state untouched;
    /// otherwise `delta = raw - baseline` is fed through the smoother.
    #[instrument(name = "conditioner_transform", level = "trace", skip(self, raw))]
    pub fn transform(&mut self, raw: &OrientationSample) -> ConditionedSample {
        let calibration = self.cell.observe(raw);
        if calibration.generation != self.seen_generation {
            // calibrated from another task since the last tick
            self.reset();
            self.seen_generation = calibration.generation;
        }

        let baseline = calibration.baseline;
        let mut values = [None; 3];
        for (idx, axis) in Axis::ALL.into_iter().enumerate() {
            values[idx] = raw
                .axis(axis)
                .map(|value| self.smoothers[idx].update(value - baseline.axis(axis)));
        }

        self.ticks += 1;
        let out = ConditionedSample::from_axes(values);
        trace!(
            tick = self.ticks,
            alpha = ?out.alpha,
            beta = ?out.beta,
            gamma = ?out.gamma,
            "Sample conditioned"
        );
        out
    }

    fn align_generation(&mut self) {
        self.reset();
        self.seen_generation = self.cell.snapshot().generation;
    }
}
