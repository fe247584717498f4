//! OrientationSource - permission handling and fixed-period sampling

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_channel::{bounded, Receiver, Sender, TrySendError};
use contracts::{AccessOutcome, OrientationPlatform, OrientationSample, SamplingConfig};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::counters::{SamplerMetrics, SamplerSnapshot};
use crate::{OrientationError, Result};

/// Device orientation source
///
/// Asks the platform for access at most once, then samples it on a fixed
/// interval. `start` consumes the source, so a session samples only once.
pub struct OrientationSource {
    platform: Arc<dyn OrientationPlatform>,
    config: SamplingConfig,
    /// Cached outcome of the first access request
    access: OnceLock<AccessOutcome>,
    metrics: Arc<SamplerMetrics>,
}

impl OrientationSource {
    pub fn new(platform: Arc<dyn OrientationPlatform>, config: SamplingConfig) -> Self {
        Self {
            platform,
            config,
            access: OnceLock::new(),
            metrics: Arc::new(SamplerMetrics::new()),
        }
    }

    pub fn platform_name(&self) -> &str {
        self.platform.name()
    }

    /// Shared counters (stay valid after `start`)
    pub fn metrics(&self) -> Arc<SamplerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Query orientation access
    ///
    /// Unsupported platforms are never prompted. Platforms that need consent
    /// are prompted on the first call only; later calls return the cached
    /// outcome.
    #[instrument(
        name = "orientation_request_access",
        skip(self),
        fields(platform = %self.platform.name())
    )]
    pub fn request_access(&self) -> AccessOutcome {
        *self.access.get_or_init(|| {
            let outcome = if !self.platform.is_supported() {
                AccessOutcome::Unsupported
            } else if self.platform.requires_permission() {
                self.platform.request_permission()
            } else {
                AccessOutcome::Granted
            };

            match outcome {
                AccessOutcome::Granted => info!("Orientation access granted"),
                AccessOutcome::Denied => {
                    warn!("Orientation permission denied, continuing without controls")
                }
                AccessOutcome::Unsupported => {
                    warn!("Orientation not supported, continuing without controls")
                }
            }
            outcome
        })
    }

    /// Start sampling
    ///
    /// Fails with the access error when orientation is denied or unsupported;
    /// in that case nothing is spawned.
    #[instrument(
        name = "orientation_start",
        skip(self),
        fields(platform = %self.platform.name(), period_ms = self.config.period_ms)
    )]
    pub fn start(self) -> Result<(SamplerHandle, SampleStream)> {
        match self.request_access() {
            AccessOutcome::Granted => {}
            AccessOutcome::Denied => return Err(OrientationError::PermissionDenied),
            AccessOutcome::Unsupported => {
                return Err(OrientationError::UnsupportedPlatform {
                    platform: self.platform.name().to_string(),
                })
            }
        }

        let capacity = self.config.channel_capacity.max(1);
        let period = self.config.period().max(Duration::from_millis(1));
        let (tx, rx) = bounded(capacity);

        let task = tokio::spawn(sample_loop(
            Arc::clone(&self.platform),
            period,
            tx,
            Arc::clone(&self.metrics),
        ));

        info!(capacity, "Orientation sampling started");

        Ok((
            SamplerHandle {
                task: Some(task),
                rx: rx.clone(),
                metrics: self.metrics,
            },
            SampleStream { rx },
        ))
    }
}

async fn sample_loop(
    platform: Arc<dyn OrientationPlatform>,
    period: Duration,
    tx: Sender<OrientationSample>,
    metrics: Arc<SamplerMetrics>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        metrics.record_tick();

        let Some(sample) = platform.try_read() else {
            metrics.record_skipped();
            trace!("No orientation reading this tick");
            continue;
        };

        match tx.try_send(sample) {
            Ok(()) => metrics.record_emitted(),
            Err(TrySendError::Full(_)) => {
                metrics.record_dropped();
                debug!("Sample stream full, dropping newest sample");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Sample stream closed, sampler exiting");
                break;
            }
        }
    }
}

/// Owner of the sampling task
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SamplerHandle {
    task: Option<JoinHandle<()>>,
    rx: Receiver<OrientationSample>,
    metrics: Arc<SamplerMetrics>,
}

impl SamplerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn metrics(&self) -> SamplerSnapshot {
        self.metrics.snapshot()
    }

    /// Stop sampling
    ///
    /// Once this returns no further sample is delivered: the task has exited,
    /// the stream is closed and buffered samples are discarded.
    #[instrument(name = "orientation_stop", skip(self))]
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!(error = ?e, "Sampler task panicked");
                }
            }
        }
        self.rx.close();
        while self.rx.try_recv().is_ok() {}

        let snapshot = self.metrics.snapshot();
        info!(
            ticks = snapshot.ticks,
            emitted = snapshot.samples_emitted,
            skipped = snapshot.ticks_skipped,
            dropped = snapshot.samples_dropped,
            "Orientation sampling stopped"
        );
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Lazy, unbounded-in-time stream of raw samples
#[derive(Debug)]
pub struct SampleStream {
    rx: Receiver<OrientationSample>,
}

impl SampleStream {
    /// Next sample, or `None` once sampling has stopped
    pub async fn recv(&mut self) -> Option<OrientationSample> {
        self.rx.recv().await.ok()
    }

    /// Buffered sample if one is ready
    pub fn try_recv(&mut self) -> Option<OrientationSample> {
        self.rx.try_recv().ok()
    }

    /// Samples currently buffered
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedPlatform;

    fn config(period_ms: u64, channel_capacity: usize) -> SamplingConfig {
        SamplingConfig {
            period_ms,
            channel_capacity,
        }
    }

    fn source(platform: Arc<ScriptedPlatform>) -> OrientationSource {
        OrientationSource::new(platform, config(50, 16))
    }

    #[test]
    fn test_prompts_exactly_once() {
        let platform =
            Arc::new(ScriptedPlatform::new([]).with_permission(AccessOutcome::Granted));
        let source = source(platform.clone());

        assert_eq!(source.request_access(), AccessOutcome::Granted);
        assert_eq!(source.request_access(), AccessOutcome::Granted);
        assert_eq!(platform.prompts(), 1);
    }

    #[test]
    fn test_denied_outcome_is_cached() {
        let platform = Arc::new(ScriptedPlatform::new([]).with_permission(AccessOutcome::Denied));
        let source = source(platform.clone());

        assert_eq!(source.request_access(), AccessOutcome::Denied);
        assert_eq!(source.request_access(), AccessOutcome::Denied);
        assert_eq!(platform.prompts(), 1);
    }

    #[test]
    fn test_unsupported_never_prompts() {
        let platform =
            Arc::new(ScriptedPlatform::unsupported().with_permission(AccessOutcome::Granted));
        let source = source(platform.clone());

        assert_eq!(source.request_access(), AccessOutcome::Unsupported);
        assert_eq!(platform.prompts(), 0);
    }

    #[tokio::test]
    async fn test_start_denied_spawns_nothing() {
        let platform = Arc::new(
            ScriptedPlatform::from_samples([OrientationSample::new(1.0, 1.0, 1.0)])
                .with_permission(AccessOutcome::Denied),
        );
        let err = source(platform.clone()).start().unwrap_err();
        assert_eq!(err, OrientationError::PermissionDenied);
        assert_eq!(platform.remaining(), 1);
    }

    #[tokio::test]
    async fn test_start_unsupported_reports_platform() {
        let err = source(Arc::new(ScriptedPlatform::unsupported()))
            .start()
            .unwrap_err();
        assert_eq!(
            err,
            OrientationError::UnsupportedPlatform {
                platform: "scripted".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_in_order_and_skips_empty_ticks() {
        let platform = Arc::new(ScriptedPlatform::new([
            Some(OrientationSample::new(1.0, 0.0, 0.0)),
            None,
            Some(OrientationSample::new(2.0, 0.0, 0.0)),
            None,
            Some(OrientationSample::new(3.0, 0.0, 0.0)),
        ]));
        let (handle, mut stream) = source(platform).start().unwrap();

        for expected in [1.0, 2.0, 3.0] {
            let sample = stream.recv().await.unwrap();
            assert_eq!(sample.alpha, Some(expected));
        }

        let snapshot = handle.metrics();
        assert_eq!(snapshot.samples_emitted, 3);
        assert_eq!(snapshot.ticks_skipped, 2);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_read_per_period() {
        let platform = Arc::new(ScriptedPlatform::from_samples(
            (0..100).map(|i| OrientationSample::new(f64::from(i), 0.0, 0.0)),
        ));
        let (handle, _stream) = OrientationSource::new(platform.clone(), config(50, 128))
            .start()
            .unwrap();

        // first tick fires immediately, then one per 50 ms
        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;

        let ticks = handle.metrics().ticks;
        assert!((10..=11).contains(&ticks), "ticks = {ticks}");
        assert_eq!(platform.remaining() as u64, 100 - ticks);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_stream_drops_newest() {
        let platform = Arc::new(ScriptedPlatform::from_samples(
            (0..10).map(|i| OrientationSample::new(f64::from(i), 0.0, 0.0)),
        ));
        let (handle, mut stream) = OrientationSource::new(platform, config(10, 2))
            .start()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        // oldest samples survive
        assert_eq!(stream.try_recv().unwrap().alpha, Some(0.0));
        assert_eq!(stream.try_recv().unwrap().alpha, Some(1.0));
        assert!(stream.try_recv().is_none());

        let snapshot = handle.metrics();
        assert_eq!(snapshot.samples_emitted, 2);
        assert_eq!(snapshot.samples_dropped, 8);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sample_after_stop() {
        let platform = Arc::new(ScriptedPlatform::from_samples(
            (0..1000).map(|i| OrientationSample::new(f64::from(i), 0.0, 0.0)),
        ));
        let (handle, mut stream) = source(platform.clone()).start().unwrap();

        assert!(stream.recv().await.is_some());
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!stream.is_empty());

        handle.stop().await;
        let remaining = platform.remaining();

        assert!(stream.recv().await.is_none());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(stream.try_recv().is_none());
        assert_eq!(platform.remaining(), remaining, "no reads after stop");
    }

    struct FaultyPlatform;

    impl OrientationPlatform for FaultyPlatform {
        fn name(&self) -> &str {
            "faulty"
        }

        fn is_supported(&self) -> bool {
            true
        }

        fn requires_permission(&self) -> bool {
            false
        }

        fn request_permission(&self) -> AccessOutcome {
            AccessOutcome::Granted
        }

        fn try_read(&self) -> Option<OrientationSample> {
            panic!("sensor driver fault");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_sampler_panic() {
        let source = OrientationSource::new(Arc::new(FaultyPlatform), config(50, 16));
        let (handle, mut stream) = source.start().unwrap();

        assert!(stream.recv().await.is_none());
        assert!(!handle.is_running());
        assert_eq!(handle.metrics().ticks, 1);
        assert_eq!(handle.metrics().samples_emitted, 0);

        handle.stop().await;
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_handle_aborts_task() {
        let platform = Arc::new(ScriptedPlatform::from_samples(
            (0..1000).map(|i| OrientationSample::new(f64::from(i), 0.0, 0.0)),
        ));
        let (handle, _stream) = source(platform.clone()).start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(handle);
        tokio::task::yield_now().await;

        let remaining = platform.remaining();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(platform.remaining(), remaining);
    }
}
