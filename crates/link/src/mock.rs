//! Mock transport
//!
//! Scripted open outcomes, captured outbound frames, manual close injection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    ChannelClosed, CloseReporter, ContractError, DuplexChannel, Endpoint, Transport,
};
use tokio::sync::mpsc;
use tracing::debug;

/// What the next `open` does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Open a channel
    Accept,
    /// Fail with the given message
    Refuse(String),
    /// Never resolve
    Hang,
}

impl MockOutcome {
    pub fn refuse(message: impl Into<String>) -> Self {
        Self::Refuse(message.into())
    }
}

#[derive(Debug)]
struct MockConnection {
    outbound: mpsc::UnboundedReceiver<String>,
    frames: Vec<String>,
    reporter: Option<CloseReporter>,
}

impl MockConnection {
    fn drain(&mut self) {
        while let Ok(frame) = self.outbound.try_recv() {
            self.frames.push(frame);
        }
    }
}

#[derive(Debug)]
struct MockState {
    script: VecDeque<MockOutcome>,
    /// Used once the script runs out
    fallback: MockOutcome,
    connections: Vec<MockConnection>,
}

/// In-memory transport for tests
///
/// Clones share state, so a test keeps one clone to inspect what the
/// connection manager did with the other.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    attempts: Arc<AtomicU32>,
}

impl MockTransport {
    /// Accept every open
    pub fn new() -> Self {
        Self::with_fallback([], MockOutcome::Accept)
    }

    /// Refuse every open
    pub fn refusing() -> Self {
        Self::with_fallback([], MockOutcome::refuse("connection refused"))
    }

    /// Play `script` in order, then accept
    pub fn with_script(script: impl IntoIterator<Item = MockOutcome>) -> Self {
        Self::with_fallback(script, MockOutcome::Accept)
    }

    pub fn with_fallback(
        script: impl IntoIterator<Item = MockOutcome>,
        fallback: MockOutcome,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                script: script.into_iter().collect(),
                fallback,
                connections: Vec::new(),
            })),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Replace the outcome used once the script runs out
    pub fn set_fallback(&self, outcome: MockOutcome) {
        self.lock().fallback = outcome;
    }

    /// Append to the script
    pub fn push(&self, outcome: MockOutcome) {
        self.lock().script.push_back(outcome);
    }

    /// Number of `open` calls so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Number of channels opened so far
    pub fn connections(&self) -> usize {
        self.lock().connections.len()
    }

    /// Frames received on connection `index`, in order
    pub fn frames(&self, index: usize) -> Vec<String> {
        let mut state = self.lock();
        match state.connections.get_mut(index) {
            Some(connection) => {
                connection.drain();
                connection.frames.clone()
            }
            None => Vec::new(),
        }
    }

    /// Frames across all connections, in connection order
    pub fn all_frames(&self) -> Vec<String> {
        let mut state = self.lock();
        state
            .connections
            .iter_mut()
            .flat_map(|connection| {
                connection.drain();
                connection.frames.clone()
            })
            .collect()
    }

    /// Simulate the server side closing connection `index`
    pub fn close(&self, index: usize, reason: ChannelClosed) {
        let reporter = self
            .lock()
            .connections
            .get_mut(index)
            .and_then(|connection| connection.reporter.take());
        if let Some(reporter) = reporter {
            debug!(index, reason = %reason, "Mock transport closing connection");
            reporter.report(reason);
        }
    }

    /// Whether the manager released connection `index`
    pub fn is_released(&self, index: usize) -> bool {
        let mut state = self.lock();
        state.connections.get_mut(index).is_some_and(|connection| {
            connection.drain();
            connection.outbound.is_closed() && connection.outbound.is_empty()
        })
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_outcome(&self) -> MockOutcome {
        let mut state = self.lock();
        match state.script.pop_front() {
            Some(outcome) => outcome,
            None => state.fallback.clone(),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, endpoint: &Endpoint) -> Result<DuplexChannel, ContractError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.next_outcome();
        debug!(endpoint = %endpoint, attempt, outcome = ?outcome, "Mock transport open");

        match outcome {
            MockOutcome::Accept => {
                let (channel, driver) = DuplexChannel::pair();
                let (outbound, reporter) = driver.split();
                self.lock().connections.push(MockConnection {
                    outbound,
                    frames: Vec::new(),
                    reporter: Some(reporter),
                });
                Ok(channel)
            }
            MockOutcome::Refuse(message) => Err(ContractError::transport_connect(endpoint, message)),
            MockOutcome::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let transport = MockTransport::with_script([MockOutcome::refuse("nope")]);
        let endpoint = Endpoint::default();

        let err = transport.open(&endpoint).await.unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert!(transport.open(&endpoint).await.is_ok());
        assert_eq!(transport.attempts(), 2);
        assert_eq!(transport.connections(), 1);
    }

    #[tokio::test]
    async fn test_captures_frames_and_injects_close() {
        let transport = MockTransport::new();
        let channel = transport.open(&Endpoint::default()).await.unwrap();
        let (sender, closed) = channel.split();

        sender.send("hello".to_string()).unwrap();
        assert_eq!(transport.frames(0), ["hello"]);

        transport.close(0, ChannelClosed::Closed);
        assert_eq!(closed.wait().await, ChannelClosed::Closed);

        drop(sender);
        assert!(transport.is_released(0));
    }
}
