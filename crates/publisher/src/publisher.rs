//! ControlPublisher - conditioned samples to controls messages

use std::sync::Arc;

use contracts::{ClientMessage, ConditionedSample, ControlSink};
use tokio::sync::watch;
use tracing::trace;

use crate::counters::PublisherMetrics;

/// Forwards every conditioned sample to a sink
///
/// One call, one message: no buffering, coalescing or rate limiting. The
/// latest sample is also published on a `watch` channel for display,
/// whether or not the sink took it.
pub struct ControlPublisher<S> {
    sink: S,
    metrics: Arc<PublisherMetrics>,
    latest: watch::Sender<Option<ConditionedSample>>,
}

impl<S: ControlSink> ControlPublisher<S> {
    pub fn new(sink: S) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            sink,
            metrics: Arc::new(PublisherMetrics::new()),
            latest,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn metrics(&self) -> Arc<PublisherMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Latest published sample, `None` until the first one
    pub fn watch(&self) -> watch::Receiver<Option<ConditionedSample>> {
        self.latest.subscribe()
    }

    /// Publish one sample
    ///
    /// Returns whether the sink accepted it. A refused message is dropped
    /// for good.
    pub fn publish(&self, sample: &ConditionedSample) -> bool {
        self.latest.send_replace(Some(*sample));

        let message = ClientMessage::controls(sample);
        let delivered = self.sink.deliver(&message);
        if delivered {
            self.metrics.inc_forwarded();
            metrics::counter!("gyro_pad_controls_total", "outcome" => "forwarded").increment(1);
        } else {
            self.metrics.inc_dropped();
            metrics::counter!("gyro_pad_controls_total", "outcome" => "dropped").increment(1);
        }

        trace!(
            sink = self.sink.name(),
            delivered,
            alpha = ?sample.alpha,
            beta = ?sample.beta,
            gamma = ?sample.gamma,
            "Controls published"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Sink that records encoded frames while `open`
    #[derive(Default)]
    struct RecordingSink {
        open: AtomicBool,
        frames: Mutex<Vec<String>>,
    }

    impl ControlSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&self, message: &ClientMessage) -> bool {
            if !self.open.load(Ordering::SeqCst) {
                return false;
            }
            self.frames.lock().unwrap().push(message.encode().unwrap());
            true
        }
    }

    #[test]
    fn test_one_message_per_publish() {
        let sink = Arc::new(RecordingSink::default());
        sink.open.store(true, Ordering::SeqCst);
        let publisher = ControlPublisher::new(Arc::clone(&sink));

        for i in 0..5 {
            let sample = ConditionedSample::from_axes([Some(f64::from(i)), None, None]);
            assert!(publisher.publish(&sample));
        }

        let frames = sink.frames.lock().unwrap();
        assert_eq!(frames.len(), 5);
        let last: serde_json::Value = serde_json::from_str(&frames[4]).unwrap();
        assert_eq!(last["type"], "controls");
        assert_eq!(last["value"]["alpha"], 4.0);
        assert!(last["value"]["beta"].is_null());
        assert_eq!(publisher.metrics().snapshot().forwarded, 5);
    }

    #[test]
    fn test_closed_sink_drops_without_queueing() {
        let sink = Arc::new(RecordingSink::default());
        let publisher = ControlPublisher::new(Arc::clone(&sink));

        assert!(!publisher.publish(&ConditionedSample::default()));
        assert!(!publisher.publish(&ConditionedSample::default()));

        sink.open.store(true, Ordering::SeqCst);
        assert!(publisher.publish(&ConditionedSample::default()));

        // earlier messages are not replayed
        assert_eq!(sink.frames.lock().unwrap().len(), 1);
        let snapshot = publisher.metrics().snapshot();
        assert_eq!(snapshot.dropped, 2);
        assert_eq!(snapshot.forwarded, 1);
        assert_eq!(snapshot.total(), 3);
    }

    #[test]
    fn test_watch_tracks_latest_even_when_dropped() {
        let publisher = ControlPublisher::new(RecordingSink::default());
        let display = publisher.watch();
        assert_eq!(*display.borrow(), None);

        let sample = ConditionedSample::from_axes([Some(1.0), Some(2.0), Some(3.0)]);
        publisher.publish(&sample);
        assert_eq!(*display.borrow(), Some(sample));
    }
}
