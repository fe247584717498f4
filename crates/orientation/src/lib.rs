//! # Orientation Source
//!
//! Device orientation sampling.
//!
//! Responsibilities:
//! - Request sensor access (prompt at most once per session)
//! - Sample the platform on a fixed period (missed ticks skipped)
//! - Deliver raw samples over a bounded channel (newest dropped when full)
//!
//! ## Usage Example
//!
//! ```ignore
//! use orientation::{OrientationSource, SimulatedPlatform};
//!
//! let source = OrientationSource::new(Arc::new(SimulatedPlatform::default()), config.sampling);
//! let (handle, mut stream) = source.start()?;
//! while let Some(sample) = stream.recv().await {
//!     // condition + publish
//! }
//! handle.stop().await;
//! ```

mod counters;
mod error;
mod platforms;
mod source;

pub use contracts::{AccessOutcome, OrientationPlatform, OrientationSample, SamplingConfig};
pub use counters::{SamplerMetrics, SamplerSnapshot};
pub use error::{OrientationError, Result};
pub use platforms::{ScriptedPlatform, SimulatedPlatform, SweepConfig};
pub use source::{OrientationSource, SampleStream, SamplerHandle};
