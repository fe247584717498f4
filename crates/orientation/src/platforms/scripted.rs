//! Scripted platform - deterministic readings for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use contracts::{AccessOutcome, OrientationPlatform, OrientationSample};

/// Platform that replays a fixed queue of readings
///
/// Each `try_read` pops one entry; a `None` entry is a tick with no reading.
/// Once the queue is empty every read returns `None`.
#[derive(Debug)]
pub struct ScriptedPlatform {
    supported: bool,
    /// `Some` when reading requires a consent prompt
    permission: Option<AccessOutcome>,
    readings: Mutex<VecDeque<Option<OrientationSample>>>,
    prompts: AtomicUsize,
}

impl ScriptedPlatform {
    /// Supported platform, no prompt, replays `readings`
    pub fn new(readings: impl IntoIterator<Item = Option<OrientationSample>>) -> Self {
        Self {
            supported: true,
            permission: None,
            readings: Mutex::new(readings.into_iter().collect()),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Supported platform emitting every sample in order
    pub fn from_samples(samples: impl IntoIterator<Item = OrientationSample>) -> Self {
        Self::new(samples.into_iter().map(Some))
    }

    /// Platform without any orientation sensor
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new([])
        }
    }

    /// Require a consent prompt that answers `outcome`
    pub fn with_permission(mut self, outcome: AccessOutcome) -> Self {
        self.permission = Some(outcome);
        self
    }

    /// Append a reading to the queue
    pub fn push(&self, reading: Option<OrientationSample>) {
        self.queue().push_back(reading);
    }

    /// Number of consent prompts shown so far
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Readings not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Option<OrientationSample>>> {
        self.readings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrientationPlatform for ScriptedPlatform {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn requires_permission(&self) -> bool {
        self.permission.is_some()
    }

    fn request_permission(&self) -> AccessOutcome {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.permission.unwrap_or(AccessOutcome::Granted)
    }

    fn try_read(&self) -> Option<OrientationSample> {
        self.queue().pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_runs_dry() {
        let platform = ScriptedPlatform::new([
            Some(OrientationSample::new(1.0, 2.0, 3.0)),
            None,
            Some(OrientationSample::new(4.0, 5.0, 6.0)),
        ]);

        assert_eq!(platform.try_read(), Some(OrientationSample::new(1.0, 2.0, 3.0)));
        assert_eq!(platform.try_read(), None);
        assert_eq!(platform.try_read(), Some(OrientationSample::new(4.0, 5.0, 6.0)));
        assert_eq!(platform.try_read(), None);
        assert_eq!(platform.remaining(), 0);
    }

    #[test]
    fn test_permission_prompt_counts() {
        let platform = ScriptedPlatform::new([]).with_permission(AccessOutcome::Denied);
        assert!(platform.requires_permission());
        assert_eq!(platform.request_permission(), AccessOutcome::Denied);
        assert_eq!(platform.prompts(), 1);
    }
}
