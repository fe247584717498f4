//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ControllerConfig;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    endpoint: String,
    player: String,
    period_ms: u64,
    smoothing_factor: f64,
    max_attempts: u32,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            error: Some(format!("File not found: {config_path}")),
            config_path,
            warnings: Vec::new(),
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&config),
            summary: Some(ConfigSummary {
                endpoint: config.server.endpoint.to_string(),
                player: config.identity().to_string(),
                period_ms: config.sampling.period_ms,
                smoothing_factor: config.conditioning.smoothing_factor,
                max_attempts: config.retry.max_attempts,
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ControllerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.identity().is_default() {
        warnings.push(format!(
            "player.name not set - server will see '{}'",
            config.identity()
        ));
    }

    if config.retry.delay_ms == 0 {
        warnings.push("retry.delay_ms is 0 - reconnects will hammer the server".to_string());
    }

    if config.sampling.period_ms < 16 {
        warnings.push(format!(
            "sampling.period_ms = {} is faster than most sensors report",
            config.sampling.period_ms
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Server: {}", summary.endpoint);
            println!("  Player: {}", summary.player);
            println!("  Sampling period: {} ms", summary.period_ms);
            println!("  Smoothing factor: {}", summary.smoothing_factor);
            println!("  Max attempts: {}", summary.max_attempts);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_file_with_summary() {
        let file = write_config(".toml", "[player]\nname = \"Ada\"\n");
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        });
        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.summary.unwrap().player, "Ada");
    }

    #[test]
    fn test_invalid_file_reports_error() {
        let file = write_config(".json", r#"{"conditioning": {"smoothing_factor": 0.0}}"#);
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("smoothing_factor"));
    }

    #[test]
    fn test_missing_file() {
        let result = validate_config(&ValidateArgs {
            config: PathBuf::from("/nonexistent/gyro-pad.toml"),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().starts_with("File not found"));
    }

    #[test]
    fn test_warnings_for_defaults() {
        let warnings = collect_warnings(&ControllerConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("player.name"));
    }
}
