//! Session statistics.

use std::time::Duration;

use contracts::{AccessOutcome, ConnectionState};
use observability::ControlSummary;
use orientation::SamplerSnapshot;
use publisher::PublisherSnapshot;

/// Statistics from a session run
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Wall time from start to teardown
    pub duration: Duration,

    /// Sensor access decision
    pub access: AccessOutcome,

    /// Connection state just before teardown
    pub final_state: ConnectionState,

    /// Conditioning and delivery aggregates
    pub control: ControlSummary,

    /// Sampler counters (zero when sampling never started)
    pub sampler: SamplerSnapshot,

    /// Publisher counters
    pub publisher: PublisherSnapshot,
}

impl SessionStats {
    /// Control ticks per second
    pub fn tick_rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.control.ticks as f64 / secs
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!();
        println!("Session: {:.2}s, {:.2} ticks/s", self.duration.as_secs_f64(), self.tick_rate());
        println!("Orientation access: {:?}", self.access);
        println!("Final connection state: {}", self.final_state);
        println!(
            "Sampler: {} ticks, {} emitted, {} empty, {} dropped",
            self.sampler.ticks,
            self.sampler.samples_emitted,
            self.sampler.ticks_skipped,
            self.sampler.samples_dropped
        );
        println!(
            "Publisher: {} forwarded, {} dropped",
            self.publisher.forwarded, self.publisher.dropped
        );
        println!();
        print!("{}", self.control);
        println!();
    }
}
