//! Config validation module
//!
//! Rules:
//! - field ranges declared on `ControllerConfig` (period, capacity, smoothing, retry)
//! - player name free of control characters
//! - retry delay > 0 when more than one attempt is allowed

use contracts::{ContractError, ControllerConfig};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate ControllerConfig
///
/// Returns the first error encountered (field paths sorted), or Ok(()).
pub fn validate(config: &ControllerConfig) -> Result<(), ContractError> {
    validate_field_rules(config)?;
    validate_player_name(config)?;
    validate_retry(config)?;
    Ok(())
}

/// Declarative range/length rules
fn validate_field_rules(config: &ControllerConfig) -> Result<(), ContractError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut violations = Vec::new();
    flatten_errors(&errors, None, &mut violations);
    violations.sort();

    match violations.into_iter().next() {
        Some((field, message)) => Err(ContractError::config_validation(field, message)),
        None => Ok(()),
    }
}

fn flatten_errors(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<(String, String)>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let value = error
                        .params
                        .get("value")
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "?".to_string());
                    let message = match &error.message {
                        Some(m) => m.to_string(),
                        None => format!("failed '{}' check (value: {value})", error.code),
                    };
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten_errors(inner, Some(&format!("{path}[{idx}]")), out);
                }
            }
        }
    }
}

/// Player name must be printable
fn validate_player_name(config: &ControllerConfig) -> Result<(), ContractError> {
    if let Some(name) = &config.player.name {
        if name.chars().any(char::is_control) {
            return Err(ContractError::config_validation(
                "player.name",
                "player name cannot contain control characters",
            ));
        }
    }
    Ok(())
}

/// A zero delay with several attempts would spin on a dead server
fn validate_retry(config: &ControllerConfig) -> Result<(), ContractError> {
    let retry = &config.retry;
    if retry.max_attempts > 1 && retry.delay_ms == 0 {
        return Err(ContractError::config_validation(
            "retry.delay_ms",
            format!(
                "delay_ms must be > 0 when max_attempts ({}) > 1",
                retry.max_attempts
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&ControllerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_smoothing_factor_reports_path() {
        let mut config = ControllerConfig::default();
        config.conditioning.smoothing_factor = 0.0;
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(&err, ContractError::ConfigValidation { field, .. } if field == "conditioning.smoothing_factor"),
            "got: {err}"
        );
    }

    #[test]
    fn test_zero_period() {
        let mut config = ControllerConfig::default();
        config.sampling.period_ms = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("sampling.period_ms"), "got: {err}");
    }

    #[test]
    fn test_zero_retries() {
        let mut config = ControllerConfig::default();
        config.retry.max_attempts = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("retry.max_attempts"), "got: {err}");
    }

    #[test]
    fn test_zero_delay_with_retries() {
        let mut config = ControllerConfig::default();
        config.retry.delay_ms = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("delay_ms must be > 0"), "got: {err}");

        config.retry.max_attempts = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_control_characters_in_name() {
        let mut config = ControllerConfig::default();
        config.player.name = Some("bad\u{7}name".into());
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("control characters"), "got: {err}");
    }

    #[test]
    fn test_name_too_long() {
        let mut config = ControllerConfig::default();
        config.player.name = Some("x".repeat(65));
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("player.name"), "got: {err}");
    }
}
