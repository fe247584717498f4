//! # Link
//!
//! Connection to the game server.
//!
//! Responsibilities:
//! - Open the duplex channel through a [`Transport`](contracts::Transport)
//! - Register the player on every successful connection
//! - Retry with a fixed delay until the budget is spent
//! - Best-effort delivery of ready/controls messages
//!
//! ## Usage Example
//!
//! ```ignore
//! use link::{ConnectionManager, LinkConfig, WebSocketTransport};
//!
//! let link = ConnectionManager::new(WebSocketTransport::default(), LinkConfig::default(), identity);
//! link.connect();
//! link.wait_connected().await?;
//! link.send_ready();
//! ```

mod config;
mod error;
mod event;
mod manager;
mod mock;
mod websocket;

pub use config::LinkConfig;
pub use contracts::{ConnectionState, ControlSink, Endpoint, PlayerIdentity};
pub use error::{LinkError, Result};
pub use event::LinkEvent;
pub use manager::ConnectionManager;
pub use mock::{MockOutcome, MockTransport};
pub use websocket::WebSocketTransport;
