//! # Signal Conditioner
//!
//! Turns raw orientation samples into the control signal.
//!
//! Responsibilities:
//! - Baseline calibration (explicit user action only)
//! - Per-axis baseline subtraction
//! - Per-axis exponential smoothing (low-pass)
//! - Absent-axis propagation
//!
//! ## Usage Example
//!
//! ```
//! use conditioner::SignalConditioner;
//! use contracts::OrientationSample;
//!
//! let mut conditioner = SignalConditioner::new(0.1).unwrap();
//! let raw = OrientationSample::new(10.0, 5.0, 0.0);
//!
//! // identity on the first tick
//! let out = conditioner.transform(&raw);
//! assert_eq!(out.alpha, Some(10.0));
//!
//! // current position becomes "zero"
//! conditioner.calibrate(&raw);
//! assert_eq!(conditioner.transform(&raw).alpha, Some(0.0));
//! ```

mod baseline;
mod conditioner;
mod error;
mod filter;

pub use baseline::CalibrationHandle;
pub use conditioner::{SignalConditioner, SmoothingState};
pub use contracts::{Baseline, ConditionedSample, ConditioningConfig, OrientationSample};
pub use error::{ConditionerError, Result};
pub use filter::AxisSmoother;
