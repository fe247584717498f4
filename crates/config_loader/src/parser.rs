//! Config parsing module
//!
//! Supports TOML (primary) and JSON formats.

use contracts::{ContractError, ControllerConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<ControllerConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<ControllerConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<ControllerConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_empty_is_default() {
        let config = parse_toml("").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_parse_toml_partial_section() {
        let content = r#"
[sampling]
period_ms = 200
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.sampling.period_ms, 200);
        // untouched fields keep their defaults
        assert_eq!(config.sampling.channel_capacity, 16);
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "server": { "endpoint": "game.local:9001" },
            "player": { "name": "Kim" }
        }"#;
        let config = parse_json(content).unwrap();
        assert_eq!(config.server.endpoint.port(), 9001);
        assert_eq!(config.player.name.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_parse_bad_endpoint_is_parse_error() {
        let content = r#"
[server]
endpoint = "no-port-here"
"#;
        let err = parse_toml(content).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
        assert!(err.to_string().contains("expected host:port"), "got: {err}");
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
