//! Built-in orientation platforms

mod scripted;
mod simulated;

pub use scripted::ScriptedPlatform;
pub use simulated::{SimulatedPlatform, SweepConfig};
