//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ControllerConfig;

use super::load_config;
use crate::cli::InfoArgs;

/// Effective configuration for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    source: String,
    server_url: String,
    player: String,
    retry_window_ms: u64,
    #[serde(flatten)]
    config: &'a ControllerConfig,
}

impl<'a> ConfigInfo<'a> {
    fn new(config: &'a ControllerConfig, args: &InfoArgs) -> Self {
        Self {
            source: source_label(args),
            server_url: config.server.endpoint.ws_url(),
            player: config.identity().to_string(),
            retry_window_ms: retry_window_ms(config),
            config,
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(source = %source_label(args), "Loading configuration info");

    let config = load_config(args.config.as_deref(), &args.overrides)?;

    if args.json {
        let json = serde_json::to_string_pretty(&ConfigInfo::new(&config, args))
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else if args.toml {
        let toml = config_loader::ConfigLoader::to_toml(&config)
            .context("Failed to serialize config as TOML")?;
        print!("{}", toml);
    } else {
        print_config_info(&config, args);
    }

    Ok(())
}

fn source_label(args: &InfoArgs) -> String {
    match &args.config {
        Some(path) => path.display().to_string(),
        None => "defaults".to_string(),
    }
}

/// Worst-case time spent retrying before the link reports failure
fn retry_window_ms(config: &ControllerConfig) -> u64 {
    u64::from(config.retry.max_attempts) * config.retry.delay_ms
}

fn print_config_info(config: &ControllerConfig, args: &InfoArgs) {
    println!("\n=== gyro-pad configuration ({}) ===\n", source_label(args));

    println!("[server]");
    println!("  endpoint = {}", config.server.endpoint);
    println!("  url      = {}", config.server.endpoint.ws_url());

    println!("\n[player]");
    match &config.player.name {
        Some(name) => println!("  name = {name}"),
        None => println!("  name = {} (default)", config.identity()),
    }

    println!("\n[sampling]");
    println!("  period_ms        = {}", config.sampling.period_ms);
    println!("  channel_capacity = {}", config.sampling.channel_capacity);

    println!("\n[conditioning]");
    println!("  smoothing_factor = {}", config.conditioning.smoothing_factor);
    match conditioner::AxisSmoother::new(config.conditioning.smoothing_factor) {
        Ok(smoother) => println!(
            "  settle_ticks     = {} (to within 1e-6 of a step)",
            smoother.ticks_to_converge(1e-6)
        ),
        Err(e) => println!("  settle_ticks     = n/a ({e})"),
    }

    println!("\n[retry]");
    println!("  max_attempts = {}", config.retry.max_attempts);
    println!("  delay_ms     = {}", config.retry.delay_ms);
    println!("  gives up after ~{} ms", retry_window_ms(config));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> InfoArgs {
        InfoArgs {
            config: None,
            overrides: Default::default(),
            json: true,
            toml: false,
        }
    }

    #[test]
    fn test_retry_window() {
        let config = ControllerConfig::default();
        // 5 retries, 5 waits of 2 s
        assert_eq!(retry_window_ms(&config), 10_000);
    }

    #[test]
    fn test_json_contains_sections_and_derived_fields() {
        let config = ControllerConfig::default();
        let value = serde_json::to_value(ConfigInfo::new(&config, &args())).unwrap();

        assert_eq!(value["source"], "defaults");
        assert_eq!(value["server_url"], "ws://localhost:8080");
        assert_eq!(value["player"], "Player");
        assert_eq!(value["sampling"]["period_ms"], 50);
        assert_eq!(value["retry"]["max_attempts"], 5);
    }
}
