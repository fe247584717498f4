//! `run` command implementation.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use contracts::{ControllerConfig, OrientationPlatform};
use link::WebSocketTransport;
use orientation::{ScriptedPlatform, SimulatedPlatform, SweepConfig};

use super::load_config;
use crate::cli::{PlatformKind, RunArgs};
use crate::session::{Session, SessionConfig, UserCommand};

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.overrides)?;

    info!(
        endpoint = %config.server.endpoint,
        player = %config.identity(),
        period_ms = config.sampling.period_ms,
        smoothing = config.conditioning.smoothing_factor,
        max_attempts = config.retry.max_attempts,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    let session_config = SessionConfig {
        controller: config,
        max_ticks: (args.max_ticks > 0).then_some(args.max_ticks),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
        display: args.display,
    };

    let platform: Arc<dyn OrientationPlatform> = match args.platform {
        PlatformKind::Simulated => Arc::new(SimulatedPlatform::new(SweepConfig::default())),
        PlatformKind::Disabled => Arc::new(ScriptedPlatform::unsupported()),
    };

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    if args.no_stdin {
        drop(command_tx);
    } else {
        spawn_stdin_reader(command_tx);
        println!("Commands: c = calibrate, r = ready, n = reconnect, q = quit");
    }

    let session = Session::new(session_config, WebSocketTransport::default(), platform);
    let stats = session
        .run(command_rx, setup_shutdown_signal())
        .await
        .context("Session failed")?;

    stats.print_summary();
    info!("gyro-pad finished");
    Ok(())
}

/// Read commands from stdin on a dedicated thread
///
/// The thread blocks on stdin and is never joined; it exits with the process.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<UserCommand>) {
    let spawned = std::thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<UserCommand>() {
                    Ok(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Ignoring input"),
                }
            }
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Stdin commands unavailable");
    }
}

/// Resolve on Ctrl+C or SIGTERM
///
/// A handler that fails to install is logged and never fires.
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &ControllerConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Server: {} ({})", config.server.endpoint, config.server.endpoint.ws_url());
    println!("Player: {}", config.identity());
    println!(
        "Sampling: every {} ms, channel capacity {}",
        config.sampling.period_ms, config.sampling.channel_capacity
    );
    println!("Smoothing factor: {}", config.conditioning.smoothing_factor);
    println!(
        "Retry: {} attempts, {} ms apart",
        config.retry.max_attempts, config.retry.delay_ms
    );
    println!();
}
