//! Orientation samples - OrientationSource output and SignalConditioner output
//!
//! Axes follow the device-orientation convention, in degrees:
//! - `alpha`: rotation around z (0..360)
//! - `beta`: front/back tilt (-180..180)
//! - `gamma`: left/right tilt (-90..90)

use serde::{Deserialize, Serialize};

/// Orientation axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Alpha,
    Beta,
    Gamma,
}

impl Axis {
    /// All axes in wire order
    pub const ALL: [Axis; 3] = [Axis::Alpha, Axis::Beta, Axis::Gamma];

    /// Axis name as used in logs and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Alpha => "alpha",
            Axis::Beta => "beta",
            Axis::Gamma => "gamma",
        }
    }
}

/// Raw orientation reading
///
/// Produced once per sampling tick. A sensor may omit any axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl OrientationSample {
    /// Create a sample with all three axes present
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// Read one axis
    pub fn axis(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Alpha => self.alpha,
            Axis::Beta => self.beta,
            Axis::Gamma => self.gamma,
        }
    }

    /// True when the sensor reported no axis at all
    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.beta.is_none() && self.gamma.is_none()
    }
}

/// Calibration reference ("zero" orientation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Baseline {
    /// Capture a raw sample as baseline; absent axes become 0.0
    pub fn capture(sample: &OrientationSample) -> Self {
        Self {
            alpha: sample.alpha.unwrap_or(0.0),
            beta: sample.beta.unwrap_or(0.0),
            gamma: sample.gamma.unwrap_or(0.0),
        }
    }

    /// Read one axis
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Alpha => self.alpha,
            Axis::Beta => self.beta,
            Axis::Gamma => self.gamma,
        }
    }
}

/// Baseline-subtracted, smoothed orientation
///
/// Sent to the server and to presentation. Absent axes stay absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionedSample {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl ConditionedSample {
    /// Build from per-axis values in [`Axis::ALL`] order
    pub fn from_axes(values: [Option<f64>; 3]) -> Self {
        let [alpha, beta, gamma] = values;
        Self { alpha, beta, gamma }
    }

    /// Read one axis
    pub fn axis(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Alpha => self.alpha,
            Axis::Beta => self.beta,
            Axis::Gamma => self.gamma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_capture_zero_defaults_absent_axes() {
        let sample = OrientationSample {
            alpha: Some(12.5),
            beta: None,
            gamma: Some(-3.0),
        };
        let baseline = Baseline::capture(&sample);
        assert_eq!(baseline.alpha, 12.5);
        assert_eq!(baseline.beta, 0.0);
        assert_eq!(baseline.gamma, -3.0);
    }

    #[test]
    fn test_sample_axis_access() {
        let sample = OrientationSample::new(1.0, 2.0, 3.0);
        let values: Vec<_> = Axis::ALL.iter().map(|a| sample.axis(*a)).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert!(!sample.is_empty());
        assert!(OrientationSample::default().is_empty());
    }

    #[test]
    fn test_sample_deserializes_null_axes() {
        let sample: OrientationSample =
            serde_json::from_str(r#"{"alpha":null,"beta":4.0,"gamma":null}"#).unwrap();
        assert_eq!(sample.alpha, None);
        assert_eq!(sample.beta, Some(4.0));
    }
}
