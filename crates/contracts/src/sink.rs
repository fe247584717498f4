//! ControlSink trait - publisher output interface

use std::sync::Arc;

use crate::ClientMessage;

/// Best-effort outbound message sink
///
/// Delivery never blocks and never queues: a sink that cannot take the
/// message right now drops it and returns `false`.
pub trait ControlSink: Send + Sync {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Hand one message to the sink
    ///
    /// Returns `true` when the message reached the transport.
    fn deliver(&self, message: &ClientMessage) -> bool;
}

impl<S: ControlSink + ?Sized> ControlSink for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn deliver(&self, message: &ClientMessage) -> bool {
        (**self).deliver(message)
    }
}
