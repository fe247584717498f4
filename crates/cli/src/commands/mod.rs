//! Command implementations.

mod info;
mod run;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ControllerConfig;
use tracing::info;

use crate::cli::ConfigOverrides;
use crate::error::CliError;

pub use info::run_info;
pub use run::run_session;
pub use validate::run_validate;

/// Load the file (or defaults), apply overrides, validate the result
fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ControllerConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            info!(config = %path.display(), "Loading configuration");
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            info!("No configuration file, using defaults");
            ControllerConfig::default()
        }
    };

    let applied = overrides.apply(&mut config);
    if !applied.is_empty() {
        info!(fields = ?applied, "Applied command-line overrides");
        config_loader::ConfigLoader::validate(&config)
            .context("Configuration invalid after overrides")?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/gyro-pad.toml")), &Default::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[player]\nname = \"FromFile\"\n[retry]\nmax_attempts = 7").unwrap();

        let overrides = ConfigOverrides {
            player: Some("FromFlag".to_string()),
            ..Default::default()
        };
        let config = load_config(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.player.name.as_deref(), Some("FromFlag"));
        assert_eq!(config.retry.max_attempts, 7);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = ConfigOverrides {
            smoothing: Some(1.5),
            ..Default::default()
        };
        assert!(load_config(None, &overrides).is_err());
    }
}
