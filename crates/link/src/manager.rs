//! ConnectionManager - duplex channel lifecycle with bounded retry

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    ChannelSender, ClientMessage, ConditionedSample, ConnectionState, ControlSink, Endpoint,
    PlayerIdentity, RetryBudget, RetryDecision, Transport,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{LinkConfig, LinkError, LinkEvent, Result};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct LinkState {
    state: ConnectionState,
    budget: RetryBudget,
    sender: Option<ChannelSender>,
    /// Bumped by `connect` and `shutdown`; supervisors from an older epoch
    /// may no longer touch the state
    epoch: u64,
}

/// Supervisor continuation after a failure
enum Next {
    Retry,
    Stop,
}

struct LinkShared {
    config: LinkConfig,
    identity: PlayerIdentity,
    state: Mutex<LinkState>,
    events: broadcast::Sender<LinkEvent>,
}

impl LinkShared {
    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: LinkEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Install an opened channel
    ///
    /// Registration is queued while the lock is held, so no other message can
    /// reach the channel ahead of it.
    fn on_connected(&self, epoch: u64, sender: ChannelSender) -> bool {
        let mut link = self.lock();
        if link.epoch != epoch {
            return false;
        }

        match ClientMessage::register(&self.identity).encode() {
            Ok(frame) => {
                if let Err(e) = sender.send(frame) {
                    warn!(error = %e, "Registration not delivered");
                }
            }
            Err(e) => error!(error = %e, "Failed to encode registration"),
        }

        link.sender = Some(sender);
        link.state = ConnectionState::Connected;
        link.budget.reset();

        metrics::counter!("gyro_pad_connections_total").increment(1);
        info!(
            endpoint = %self.config.endpoint,
            player = %self.identity,
            "Connected, player registered"
        );
        self.emit(LinkEvent::Connected);
        true
    }

    /// Count one failed attempt or lost channel against the budget
    fn on_failure(&self, epoch: u64, reason: String) -> Next {
        let mut link = self.lock();
        if link.epoch != epoch {
            return Next::Stop;
        }
        link.sender = None;
        metrics::counter!("gyro_pad_connection_failures_total").increment(1);

        match link.budget.record_failure() {
            RetryDecision::Retry(attempt) => {
                link.state = ConnectionState::Connecting;
                let max = link.budget.max();
                warn!(
                    attempt,
                    max,
                    delay_ms = self.config.retry_delay.as_millis() as u64,
                    reason = %reason,
                    "Connection failed, retrying"
                );
                self.emit(LinkEvent::Retrying {
                    attempt,
                    max,
                    reason,
                });
                Next::Retry
            }
            RetryDecision::GiveUp => {
                link.state = ConnectionState::Failed;
                let attempts = link.budget.attempts_made();
                error!(
                    endpoint = %self.config.endpoint,
                    attempts,
                    reason = %reason,
                    "could not connect"
                );
                self.emit(LinkEvent::Failed { attempts });
                Next::Stop
            }
        }
    }
}

/// Owns the duplex channel to the game server
///
/// All methods take `&self`; share the manager behind an `Arc` between the
/// publishing task and user commands.
///
/// State machine:
///
/// ```text
/// Disconnected --connect--> Connecting --open ok--> Connected
/// Connecting --fail--> Connecting (budget left) | Failed
/// Connected --closed--> Connecting (budget left) | Failed
/// any --shutdown--> Disconnected
/// ```
pub struct ConnectionManager<T> {
    transport: Arc<T>,
    shared: Arc<LinkShared>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl<T> ConnectionManager<T>
where
    T: Transport + Sync + 'static,
{
    pub fn new(transport: T, config: LinkConfig, identity: PlayerIdentity) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let budget = RetryBudget::new(config.max_attempts);
        Self {
            transport: Arc::new(transport),
            shared: Arc::new(LinkShared {
                config,
                identity,
                state: Mutex::new(LinkState {
                    state: ConnectionState::Disconnected,
                    budget,
                    sender: None,
                    epoch: 0,
                }),
                events,
            }),
            supervisor: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.shared.config.endpoint
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.shared.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.lock().state
    }

    /// Retries scheduled since the last success or explicit connect
    pub fn attempt(&self) -> u32 {
        self.shared.lock().budget.attempt()
    }

    /// Lifecycle event stream
    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.shared.events.subscribe()
    }

    /// Start connecting in the background
    ///
    /// Cancels any running supervisor and resets the retry budget. Never
    /// waits on the network.
    #[instrument(
        name = "link_connect",
        skip(self),
        fields(endpoint = %self.shared.config.endpoint, transport = self.transport.name())
    )]
    pub fn connect(&self) -> ConnectionState {
        let epoch = {
            let mut link = self.shared.lock();
            link.epoch += 1;
            link.budget.reset();
            link.sender = None;
            link.state = ConnectionState::Connecting;
            link.epoch
        };

        let task = tokio::spawn(supervise(
            Arc::clone(&self.transport),
            Arc::clone(&self.shared),
            epoch,
        ));
        let previous = self.supervisor_slot().replace(task);
        if let Some(previous) = previous {
            previous.abort();
            debug!("Previous connection supervisor cancelled");
        }

        info!("Connecting");
        ConnectionState::Connecting
    }

    /// Send the ready message (no-op unless connected)
    pub fn send_ready(&self) -> bool {
        self.send(&ClientMessage::ready(&self.shared.identity))
    }

    /// Send one controls message (no-op unless connected)
    pub fn send_controls(&self, sample: &ConditionedSample) -> bool {
        self.send(&ClientMessage::controls(sample))
    }

    /// Wait until the link is connected
    ///
    /// # Errors
    /// [`LinkError::ExhaustedRetries`] once the budget is spent,
    /// [`LinkError::Idle`] when nothing is connecting.
    pub async fn wait_connected(&self) -> Result<()> {
        let mut events = self.subscribe();
        loop {
            match self.state() {
                ConnectionState::Connected => return Ok(()),
                ConnectionState::Failed => {
                    return Err(LinkError::ExhaustedRetries {
                        attempts: self.shared.lock().budget.attempts_made(),
                    })
                }
                ConnectionState::Disconnected => return Err(LinkError::Idle),
                ConnectionState::Connecting => {}
            }
            if let Err(broadcast::error::RecvError::Closed) = events.recv().await {
                return Err(LinkError::Idle);
            }
        }
    }

    /// Tear the link down
    ///
    /// Cancels the pending retry or in-flight attempt and waits for the
    /// supervisor to finish. No events are emitted afterwards.
    #[instrument(name = "link_shutdown", skip(self))]
    pub async fn shutdown(&self) {
        {
            let mut link = self.shared.lock();
            link.epoch += 1;
            link.sender = None;
            link.state = ConnectionState::Disconnected;
        }

        let task = self.supervisor_slot().take();
        if let Some(task) = task {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!(error = ?e, "Connection supervisor panicked");
                }
            }
        }
        info!("Link shut down");
    }

    fn send(&self, message: &ClientMessage) -> bool {
        let link = self.shared.lock();
        let sender = match (&link.state, &link.sender) {
            (ConnectionState::Connected, Some(sender)) => sender,
            _ => {
                trace!(kind = message.kind(), state = %link.state, "Not connected, message dropped");
                return false;
            }
        };

        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(kind = message.kind(), error = %e, "Failed to encode message");
                return false;
            }
        };

        match sender.send(frame) {
            Ok(()) => {
                metrics::counter!("gyro_pad_frames_sent_total", "kind" => message.kind())
                    .increment(1);
                true
            }
            Err(e) => {
                debug!(kind = message.kind(), error = %e, "Channel released, message dropped");
                false
            }
        }
    }

    fn supervisor_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.supervisor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for ConnectionManager<T> {
    fn drop(&mut self) {
        let slot = self.supervisor.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.take() {
            task.abort();
        }
    }
}

impl<T> ControlSink for ConnectionManager<T>
where
    T: Transport + Sync + 'static,
{
    fn name(&self) -> &str {
        self.transport.name()
    }

    fn deliver(&self, message: &ClientMessage) -> bool {
        self.send(message)
    }
}

/// Connection supervisor: open, hold, retry
#[instrument(name = "link_supervisor", skip(transport, shared))]
async fn supervise<T>(transport: Arc<T>, shared: Arc<LinkShared>, epoch: u64)
where
    T: Transport + Sync + 'static,
{
    loop {
        metrics::counter!("gyro_pad_connection_attempts_total").increment(1);

        let reason = match transport.open(&shared.config.endpoint).await {
            Ok(channel) => {
                let (sender, closed) = channel.split();
                if !shared.on_connected(epoch, sender) {
                    return;
                }
                let reason = closed.wait().await;
                info!(reason = %reason, "Connection lost");
                reason.to_string()
            }
            Err(e) => e.to_string(),
        };

        match shared.on_failure(epoch, reason) {
            Next::Retry => tokio::time::sleep(shared.config.retry_delay).await,
            Next::Stop => return,
        }
    }
}
