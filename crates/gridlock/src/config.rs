//! Process configuration: where the server listens.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

/// Host used when `HOST` is not set.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Listen settings, read from the environment with fixed fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Loads the config from `HOST` / `PORT`, falling back to
    /// `0.0.0.0:3000`.
    ///
    /// Callers that want a `.env` file honored should load it first
    /// (the binary does, via `dotenv`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// A builder pre-seeded with the defaults, without any environment.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))
    }

    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        let config: ServerConfig = ServerConfig::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_port_override() {
        let config: ServerConfig = ServerConfig::defaults()
            .unwrap()
            .set_override("port", 4100_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_port_out_of_range_is_rejected() {
        let result = ServerConfig::defaults()
            .unwrap()
            .set_override("port", 70_000_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<ServerConfig>();
        assert!(result.is_err());
    }
}
