//! Controller session orchestration.

mod commands;
mod orchestrator;
mod stats;

pub use commands::UserCommand;
pub use orchestrator::{Session, SessionConfig};
pub use stats::SessionStats;
