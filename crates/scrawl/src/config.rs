//! Server configuration.

use scrawl_game::OrchestratorConfig;
use scrawl_transport::DEFAULT_MAX_MESSAGE_SIZE;

use crate::ScrawlError;

/// Address used when neither `SCRAWL_BIND` nor `PORT` is set.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Everything needed to start a server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Largest inbound WebSocket message, in bytes.
    pub max_message_size: usize,
    pub orchestrator: OrchestratorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// - `SCRAWL_BIND`: full listen address, e.g. `127.0.0.1:8080`
    /// - `PORT`: port on all interfaces, used when `SCRAWL_BIND` is unset
    /// - `SCRAWL_MAX_MESSAGE_BYTES`: inbound message cap
    pub fn from_env() -> Result<Self, ScrawlError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through
    /// `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScrawlError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("SCRAWL_BIND").filter(|a| !a.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| {
                ScrawlError::Config(format!("PORT must be a port number, got {port:?}"))
            })?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Some(max) = lookup("SCRAWL_MAX_MESSAGE_BYTES") {
            config.max_message_size = match max.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ScrawlError::Config(format!(
                        "SCRAWL_MAX_MESSAGE_BYTES must be a positive number, got {max:?}"
                    )));
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.max_message_size, 5 * 1024 * 1024);
        assert_eq!(config.orchestrator.min_players, 3);
    }

    #[test]
    fn test_port_binds_all_interfaces() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_scrawl_bind_wins_over_port() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("SCRAWL_BIND", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ScrawlError::Config(_)));
    }

    #[test]
    fn test_max_message_bytes() {
        let config =
            ServerConfig::from_lookup(lookup(&[("SCRAWL_MAX_MESSAGE_BYTES", "1024")])).unwrap();
        assert_eq!(config.max_message_size, 1024);

        for bad in ["0", "-1", "lots"] {
            let err = ServerConfig::from_lookup(lookup(&[("SCRAWL_MAX_MESSAGE_BYTES", bad)]))
                .unwrap_err();
            assert!(matches!(err, ScrawlError::Config(_)), "{bad} should be rejected");
        }
    }
}
