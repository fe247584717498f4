//! Exponential smoothing (first-order low-pass) per axis.
//!
//! `s[n] = s[n-1] + k * (x[n] - s[n-1])`, with `s[0] = x[0]`.
//! Smaller `k` gives a smoother signal and more lag.

use crate::{ConditionerError, Result};

/// Single-axis exponential smoother
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSmoother {
    /// Smoothing factor k in (0, 1)
    factor: f64,
    /// Last smoothed value (None until the first update)
    last: Option<f64>,
}

impl AxisSmoother {
    /// Create a smoother; rejects factors outside (0, 1) and NaN
    pub fn new(factor: f64) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(ConditionerError::InvalidSmoothingFactor { factor });
        }
        Ok(Self { factor, last: None })
    }

    /// Feed one delta, return the smoothed value
    ///
    /// The first value passes through unchanged (no ramp-up from zero).
    #[inline]
    pub fn update(&mut self, delta: f64) -> f64 {
        let smoothed = match self.last {
            Some(prev) => prev + self.factor * (delta - prev),
            None => delta,
        };
        self.last = Some(smoothed);
        smoothed
    }

    /// Last smoothed value
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Forget history; the next update is the identity again
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Ticks a unit step needs before the residual error drops below `epsilon`
    ///
    /// Residual after n ticks is `(1 - k)^n`, so n = ceil(ln(eps) / ln(1 - k)).
    /// An `epsilon` of 1 or more is met immediately; zero, negative or NaN
    /// is never met and yields `u32::MAX`.
    pub fn ticks_to_converge(&self, epsilon: f64) -> u32 {
        if epsilon >= 1.0 {
            return 0;
        }
        if !(epsilon > 0.0) {
            return u32::MAX;
        }
        (epsilon.ln() / (1.0 - self.factor).ln()).ceil() as u32
    }
}
