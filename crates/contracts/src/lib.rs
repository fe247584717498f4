//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the controller.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Signal Model
//! - Orientation axes are degrees (`alpha`, `beta`, `gamma`), each optional
//! - Emission order is the only sequence; the latest sample replaces the previous one
//!
//! ## Collaborators
//! - [`OrientationPlatform`]: sensor permission + non-blocking reads
//! - [`Transport`]: opens the duplex channel to the game server
//! - [`ControlSink`]: best-effort destination for outbound messages

mod connection;
mod controller_config;
mod endpoint;
mod error;
mod identity;
mod platform;
mod protocol;
mod sample;
mod sink;
mod transport;

pub use connection::*;
pub use controller_config::*;
pub use endpoint::Endpoint;
pub use error::*;
pub use identity::PlayerIdentity;
pub use platform::{AccessOutcome, OrientationPlatform};
pub use protocol::*;
pub use sample::*;
pub use sink::ControlSink;
pub use transport::*;
