//! # Publisher
//!
//! Control message publishing.
//!
//! - Wraps each conditioned sample in a `controls` message
//! - Forwards it to a `ControlSink` without buffering or rate limiting
//! - Keeps the latest sample observable for display

mod counters;
mod publisher;

pub use contracts::{ClientMessage, ConditionedSample, ControlSink};
pub use counters::{PublisherMetrics, PublisherSnapshot};
pub use publisher::ControlPublisher;
