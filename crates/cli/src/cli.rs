//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::{ControllerConfig, Endpoint};
use std::path::PathBuf;

/// gyro-pad - turn device tilt into game controls
#[derive(Parser, Debug)]
#[command(
    name = "gyro-pad",
    author,
    version,
    about = "Tilt-controller client for a WebSocket game server",
    long_about = "Samples device orientation, calibrates and smooths it, and streams the \n\
                  result as control messages to a game server over a WebSocket.\n\n\
                  While running, type `c` to calibrate, `r` to signal ready, \n\
                  `n` to reconnect and `q` to quit."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "GYRO_PAD_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "GYRO_PAD_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a controller session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "GYRO_PAD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Orientation platform to sample
    #[arg(long, value_enum, default_value = "simulated", env = "GYRO_PAD_PLATFORM")]
    pub platform: PlatformKind,

    /// Stop after this many control ticks (0 = unlimited)
    #[arg(long, default_value = "0", env = "GYRO_PAD_MAX_TICKS")]
    pub max_ticks: u64,

    /// Session timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "GYRO_PAD_TIMEOUT")]
    pub timeout: u64,

    /// Ignore stdin commands
    #[arg(long)]
    pub no_stdin: bool,

    /// Print the live conditioned orientation
    #[arg(long)]
    pub display: bool,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "GYRO_PAD_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Values that override the configuration file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Game server `host:port`
    #[arg(long, env = "GYRO_PAD_ENDPOINT")]
    pub endpoint: Option<Endpoint>,

    /// Player display name
    #[arg(long, env = "GYRO_PAD_PLAYER")]
    pub player: Option<String>,

    /// Sampling period in milliseconds
    #[arg(long, env = "GYRO_PAD_PERIOD_MS")]
    pub period_ms: Option<u64>,

    /// Smoothing factor in (0, 1)
    #[arg(long, env = "GYRO_PAD_SMOOTHING")]
    pub smoothing: Option<f64>,

    /// Reconnection attempts after the first failure before giving up
    #[arg(long, env = "GYRO_PAD_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Delay between connection attempts in milliseconds
    #[arg(long, env = "GYRO_PAD_RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Write every set override into `config`; returns the names applied
    pub fn apply(&self, config: &mut ControllerConfig) -> Vec<&'static str> {
        let mut applied = Vec::new();
        if let Some(endpoint) = &self.endpoint {
            config.server.endpoint = endpoint.clone();
            applied.push("server.endpoint");
        }
        if let Some(player) = &self.player {
            config.player.name = Some(player.clone());
            applied.push("player.name");
        }
        if let Some(period_ms) = self.period_ms {
            config.sampling.period_ms = period_ms;
            applied.push("sampling.period_ms");
        }
        if let Some(smoothing) = self.smoothing {
            config.conditioning.smoothing_factor = smoothing;
            applied.push("conditioning.smoothing_factor");
        }
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
            applied.push("retry.max_attempts");
        }
        if let Some(delay_ms) = self.retry_delay_ms {
            config.retry.delay_ms = delay_ms;
            applied.push("retry.delay_ms");
        }
        applied
    }
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "gyro-pad.toml", env = "GYRO_PAD_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults apply when omitted
    #[arg(short, long, env = "GYRO_PAD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Output as JSON
    #[arg(long, conflicts_with = "toml")]
    pub json: bool,

    /// Output as a TOML file that `run --config` accepts
    #[arg(long)]
    pub toml: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Orientation platform selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlatformKind {
    /// Synthetic tilt sweep
    #[default]
    Simulated,
    /// No orientation sensor (connection only)
    #[value(name = "none")]
    Disabled,
}
