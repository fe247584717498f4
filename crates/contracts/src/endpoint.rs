//! Endpoint - `host:port` address of the game server

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Duplex-channel address.
///
/// Only `host:port` is accepted; scheme and path are chosen by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// WebSocket URL for this endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("localhost", 8080)
    }
}

impl FromStr for Endpoint {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (host, port) = input
            .rsplit_once(':')
            .ok_or_else(|| ContractError::invalid_endpoint(input, "expected host:port"))?;

        // Bracketed IPv6 literal, e.g. [::1]:8080
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if host.is_empty() {
            return Err(ContractError::invalid_endpoint(input, "host is empty"));
        }
        if host.contains('/') || (host.contains(':') && !input.starts_with('[')) {
            return Err(ContractError::invalid_endpoint(
                input,
                "scheme or path not allowed",
            ));
        }

        let port: u16 = port
            .parse()
            .map_err(|e| ContractError::invalid_endpoint(input, format!("bad port: {e}")))?;
        if port == 0 {
            return Err(ContractError::invalid_endpoint(input, "port must be > 0"));
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let ep: Endpoint = "localhost:8080".parse().unwrap();
        assert_eq!(ep.host(), "localhost");
        assert_eq!(ep.port(), 8080);
        assert_eq!(ep.ws_url(), "ws://localhost:8080");
    }

    #[test]
    fn test_parse_ipv6() {
        let ep: Endpoint = "[::1]:9000".parse().unwrap();
        assert_eq!(ep.host(), "::1");
        assert_eq!(ep.to_string(), "[::1]:9000");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["localhost", ":8080", "host:0", "host:99999", "ws://host:80"] {
            let result = bad.parse::<Endpoint>();
            assert!(
                matches!(result, Err(ContractError::InvalidEndpoint { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let ep = Endpoint::new("10.0.0.2", 8080);
        let json = serde_json::to_string(&ep).unwrap();
        assert_eq!(json, "\"10.0.0.2:8080\"");
        let back: Endpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ep);
    }
}
