//! WebSocketTransport - text frames over `ws://host:port`

use std::time::Duration;

use contracts::{ChannelClosed, CloseReporter, ContractError, DuplexChannel, Endpoint, Transport};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client transport
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    /// Upper bound on TCP connect + handshake
    connect_timeout: Duration,
}

impl WebSocketTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Transport for WebSocketTransport {
    fn name(&self) -> &str {
        "websocket"
    }

    #[instrument(name = "websocket_open", skip(self), fields(endpoint = %endpoint))]
    async fn open(&self, endpoint: &Endpoint) -> Result<DuplexChannel, ContractError> {
        let url = endpoint.ws_url();
        let handshake = tokio_tungstenite::connect_async(url.as_str());
        let (stream, response) = tokio::time::timeout(self.connect_timeout, handshake)
            .await
            .map_err(|_| ContractError::transport_connect(endpoint, "handshake timed out"))?
            .map_err(|e| ContractError::transport_connect(endpoint, e.to_string()))?;

        debug!(url = %url, status = %response.status(), "WebSocket handshake complete");

        let (channel, driver) = DuplexChannel::pair();
        let (outbound, reporter) = driver.split();
        tokio::spawn(pump(stream, outbound, reporter));

        Ok(channel)
    }
}

/// Moves frames between the socket and the channel until either side stops
///
/// Dropping every `ChannelSender` ends the pump with a close frame.
async fn pump(
    stream: WsStream,
    mut outbound: mpsc::UnboundedReceiver<String>,
    reporter: CloseReporter,
) {
    let (mut write, mut read) = stream.split();

    let reason = loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(e) = write.send(Message::text(text)).await {
                        break ChannelClosed::Error(e.to_string());
                    }
                }
                None => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(error = %e, "Close frame not sent");
                    }
                    break ChannelClosed::Closed;
                }
            },
            inbound = read.next() => match inbound {
                Some(Ok(Message::Close(frame))) => {
                    debug!(frame = ?frame, "Server closed connection");
                    break ChannelClosed::Closed;
                }
                Some(Ok(Message::Text(text))) => {
                    debug!(frame = %text.as_str(), "Inbound frame ignored");
                }
                Some(Ok(other)) => {
                    debug!(len = other.len(), "Inbound non-text frame ignored");
                }
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket read error");
                    break ChannelClosed::Error(e.to_string());
                }
                None => break ChannelClosed::Closed,
            },
        }
    };

    debug!(reason = %reason, "WebSocket pump stopped");
    reporter.report(reason);
}
