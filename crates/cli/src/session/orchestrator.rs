//! Session orchestrator - coordinates sampling, conditioning, publishing and
//! the server link.
//!
//! One select loop owns the conditioner, so calibration and transformation
//! never race. The link reconnects on its own; the loop only observes it.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use conditioner::SignalConditioner;
use contracts::{
    ConditionedSample, ConnectionState, ControllerConfig, OrientationPlatform, OrientationSample,
    Transport,
};
use link::{ConnectionManager, LinkConfig, LinkEvent};
use observability::{
    record_calibration, record_connection_state, record_control_tick, record_ready, ControlStats,
};
use orientation::{OrientationSource, SampleStream};
use publisher::ControlPublisher;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{SessionStats, UserCommand};

/// Session configuration
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Validated controller configuration
    pub controller: ControllerConfig,

    /// Stop after this many control ticks (None = unlimited)
    pub max_ticks: Option<u64>,

    /// Session timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Print the live conditioned orientation
    pub display: bool,
}

/// One controller session
pub struct Session<T> {
    config: SessionConfig,
    transport: T,
    platform: Arc<dyn OrientationPlatform>,
}

impl<T> Session<T>
where
    T: Transport + Sync + 'static,
{
    pub fn new(config: SessionConfig, transport: T, platform: Arc<dyn OrientationPlatform>) -> Self {
        Self {
            config,
            transport,
            platform,
        }
    }

    /// Run until quit, shutdown, timeout or the tick limit
    ///
    /// Orientation being denied or unsupported does not end the session: the
    /// link still connects and ready messages still go out.
    pub async fn run<F>(
        self,
        mut commands: mpsc::UnboundedReceiver<UserCommand>,
        shutdown: F,
    ) -> Result<SessionStats>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let Self {
            config,
            transport,
            platform,
        } = self;
        let controller = &config.controller;

        if let Some(port) = config.metrics_port {
            observability::init_metrics_only(port)?;
            info!(port, "Metrics endpoint available");
        }

        let mut conditioner = SignalConditioner::from_config(&controller.conditioning)
            .context("Invalid conditioning settings")?;

        let identity = controller.identity();
        info!(
            player = %identity,
            endpoint = %controller.server.endpoint,
            period_ms = controller.sampling.period_ms,
            smoothing = controller.conditioning.smoothing_factor,
            "Starting session"
        );

        let link = Arc::new(ConnectionManager::new(
            transport,
            LinkConfig::from(controller),
            identity,
        ));
        let mut events = link.subscribe();
        let publisher = ControlPublisher::new(Arc::clone(&link));
        record_connection_state(link.connect());

        let source = OrientationSource::new(platform, controller.sampling.clone());
        let sampler_metrics = source.metrics();
        let access = source.request_access();
        let (sampler, mut stream) = match source.start() {
            Ok((handle, stream)) => (Some(handle), Some(stream)),
            Err(e) => {
                warn!(error = %e, "Sampling disabled, ready messages still available");
                (None, None)
            }
        };

        let display = config.display.then(|| spawn_display(publisher.watch()));

        let mut control = ControlStats::new();
        let mut commands_open = true;
        let mut events_open = true;
        let mut connected_once = false;

        let expiry = expire(config.timeout);
        tokio::pin!(expiry);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }

                _ = &mut expiry => {
                    warn!(timeout = ?config.timeout, "Session timed out");
                    break;
                }

                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if !handle_command(command, &mut conditioner, &link, &mut control) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("Command input closed");
                        commands_open = false;
                    }
                },

                event = events.recv(), if events_open => match event {
                    Ok(event) => on_link_event(&event, &mut connected_once, &mut control),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Link events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => events_open = false,
                },

                sample = next_sample(&mut stream) => match sample {
                    Some(raw) => {
                        let started = Instant::now();
                        let conditioned = conditioner.transform(&raw);
                        let delivered = publisher.publish(&conditioned);
                        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

                        record_control_tick(&conditioned, delivered, latency_ms);
                        control.record_tick(&conditioned, delivered, latency_ms);

                        if let Some(max) = config.max_ticks {
                            if control.ticks >= max {
                                info!(ticks = control.ticks, "Reached max ticks limit");
                                break;
                            }
                        }
                    }
                    None => {
                        warn!("Sample stream ended");
                        stream = None;
                    }
                },
            }
        }

        info!("Shutting down session...");
        let final_state = link.state();

        if let Some(handle) = sampler {
            handle.stop().await;
        }
        link.shutdown().await;
        record_connection_state(ConnectionState::Disconnected);

        if let Some(task) = display {
            task.abort();
            println!();
        }

        let stats = SessionStats {
            duration: start_time.elapsed(),
            access,
            final_state,
            control: control.summary(),
            sampler: sampler_metrics.snapshot(),
            publisher: publisher.metrics().snapshot(),
        };

        info!(
            ticks = stats.control.ticks,
            delivered = stats.control.delivered,
            duration_secs = stats.duration.as_secs_f64(),
            "Session finished"
        );

        Ok(stats)
    }
}

/// Apply one user command; false means quit
fn handle_command<T>(
    command: UserCommand,
    conditioner: &mut SignalConditioner,
    link: &ConnectionManager<T>,
    control: &mut ControlStats,
) -> bool
where
    T: Transport + Sync + 'static,
{
    match command {
        UserCommand::Calibrate => {
            let baseline = conditioner.calibrate_latest();
            record_calibration();
            control.record_calibration();
            info!(
                alpha = baseline.alpha,
                beta = baseline.beta,
                gamma = baseline.gamma,
                "Calibrated"
            );
        }
        UserCommand::Ready => {
            let delivered = link.send_ready();
            record_ready(delivered);
            if delivered {
                info!("Ready sent");
            } else {
                warn!(state = %link.state(), "Not connected, ready not sent");
            }
        }
        UserCommand::Reconnect => {
            record_connection_state(link.connect());
        }
        UserCommand::Quit => return false,
    }
    true
}

fn on_link_event(event: &LinkEvent, connected_once: &mut bool, control: &mut ControlStats) {
    match event {
        LinkEvent::Connected => {
            record_connection_state(ConnectionState::Connected);
            if *connected_once {
                control.record_reconnect();
            }
            *connected_once = true;
        }
        LinkEvent::Retrying { .. } => record_connection_state(ConnectionState::Connecting),
        LinkEvent::Failed { attempts } => {
            record_connection_state(ConnectionState::Failed);
            warn!(attempts, "Link gave up, type `n` to reconnect");
        }
    }
}

async fn next_sample(stream: &mut Option<SampleStream>) -> Option<OrientationSample> {
    match stream {
        Some(stream) => stream.recv().await,
        None => std::future::pending().await,
    }
}

async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}

fn spawn_display(mut latest: watch::Receiver<Option<ConditionedSample>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while latest.changed().await.is_ok() {
            let current = *latest.borrow_and_update();
            let Some(sample) = current else {
                continue;
            };
            print!(
                "\ralpha {}  beta {}  gamma {}",
                fmt_axis(sample.alpha),
                fmt_axis(sample.beta),
                fmt_axis(sample.gamma)
            );
            let _ = std::io::stdout().flush();
        }
    })
}

fn fmt_axis(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:>8.2}"),
        None => format!("{:>8}", "--"),
    }
}
