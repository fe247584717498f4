//! Transport trait - duplex channel collaborator
//!
//! A transport opens one channel per connection attempt. The channel is split
//! into two halves so the connection manager can keep sending while another
//! task waits for the close notification:
//!
//! - [`ChannelSender`]: non-blocking, unbounded outbound text frames
//! - [`CloseNotice`]: resolves once when the channel closes or errors
//!
//! Transport implementations hold the other ends in a [`ChannelDriver`].

use std::fmt;

use tokio::sync::{mpsc, oneshot};

use crate::{ContractError, Endpoint};

/// Duplex channel opener
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Transport name (used for logging)
    fn name(&self) -> &str;

    /// Open a channel to `endpoint`
    ///
    /// # Errors
    /// Returns [`ContractError::TransportConnect`] when the channel cannot be opened
    async fn open(&self, endpoint: &Endpoint) -> Result<DuplexChannel, ContractError>;
}

/// Why a channel stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelClosed {
    /// Orderly close by either side
    Closed,
    /// Transport-level error
    Error(String),
}

impl fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelClosed::Closed => f.write_str("channel closed"),
            ChannelClosed::Error(message) => write!(f, "channel error: {message}"),
        }
    }
}

/// An open duplex channel
#[derive(Debug)]
pub struct DuplexChannel {
    sender: ChannelSender,
    closed: CloseNotice,
}

impl DuplexChannel {
    /// Create a channel and the driver half the transport keeps
    pub fn pair() -> (Self, ChannelDriver) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = oneshot::channel();
        let channel = Self {
            sender: ChannelSender { tx: outbound_tx },
            closed: CloseNotice { rx: closed_rx },
        };
        let driver = ChannelDriver {
            outbound: outbound_rx,
            closed: Some(closed_tx),
        };
        (channel, driver)
    }

    /// Split into sending half and close notification
    pub fn split(self) -> (ChannelSender, CloseNotice) {
        (self.sender, self.closed)
    }
}

/// Outbound half of a [`DuplexChannel`]
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSender {
    /// Hand one text frame to the transport without waiting
    pub fn send(&self, frame: String) -> Result<(), ContractError> {
        self.tx
            .send(frame)
            .map_err(|_| ContractError::TransportSend {
                message: "channel released".to_string(),
            })
    }
}

/// Close notification half of a [`DuplexChannel`]
#[derive(Debug)]
pub struct CloseNotice {
    rx: oneshot::Receiver<ChannelClosed>,
}

impl CloseNotice {
    /// Wait for the channel to stop
    ///
    /// A driver dropped without reporting counts as an orderly close.
    pub async fn wait(self) -> ChannelClosed {
        self.rx.await.unwrap_or(ChannelClosed::Closed)
    }
}

/// Transport-side ends of a [`DuplexChannel`]
#[derive(Debug)]
pub struct ChannelDriver {
    /// Frames queued by the connection manager
    pub outbound: mpsc::UnboundedReceiver<String>,
    closed: Option<oneshot::Sender<ChannelClosed>>,
}

impl ChannelDriver {
    /// Report the channel as stopped; only the first report is delivered
    pub fn report_closed(&mut self, reason: ChannelClosed) {
        if let Some(tx) = self.closed.take() {
            let _ = tx.send(reason);
        }
    }

    /// Split into the outbound receiver and a close reporter
    pub fn split(self) -> (mpsc::UnboundedReceiver<String>, CloseReporter) {
        (
            self.outbound,
            CloseReporter {
                closed: self.closed,
            },
        )
    }
}

/// Detached close reporter, for transports that read and write on separate tasks
#[derive(Debug)]
pub struct CloseReporter {
    closed: Option<oneshot::Sender<ChannelClosed>>,
}

impl CloseReporter {
    pub fn report(mut self, reason: ChannelClosed) {
        if let Some(tx) = self.closed.take() {
            let _ = tx.send(reason);
        }
    }
}
