//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file, if present, is read first by `main`.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use stockroom_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP port (`PORT`, default 3000)
    pub port: u16,

    /// Interface to bind (`BIND_ADDR`, default 0.0.0.0)
    pub bind_addr: String,

    /// SQLite file (`STOCKROOM_DB_PATH`, default ./stockroom.db)
    pub database_path: String,

    /// Pool size (`DB_MAX_CONNECTIONS`, default 5)
    pub db_max_connections: u32,

    /// Seconds to wait for a connection or a lock (`DB_CONNECT_TIMEOUT_SECS`, default 30)
    pub db_connect_timeout_secs: u64,

    /// Reported by `GET /` (`APP_ENV`, default production)
    pub environment: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            port: var("PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_addr: var("BIND_ADDR", "0.0.0.0"),

            database_path: var("STOCKROOM_DB_PATH", "./stockroom.db"),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            db_connect_timeout_secs: var("DB_CONNECT_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_CONNECT_TIMEOUT_SECS".to_string()))?,

            environment: var("APP_ENV", "production"),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("STOCKROOM_DB_PATH".to_string()));
        }

        Ok(config)
    }

    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))
    }

    /// Pool settings for [`stockroom_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.database_path, "./stockroom.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_connect_timeout_secs, 30);
        assert_eq!(config.environment, "production");
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("STOCKROOM_DB_PATH", "/var/lib/stockroom/data.db"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("APP_ENV", "development"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.environment, "development");

        let db = config.db_config();
        assert_eq!(db.max_connections, 12);
        assert_eq!(db.database_path.to_str(), Some("/var/lib/stockroom/data.db"));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue(name)) if name == "PORT"
        ));
        assert!(matches!(
            config_from(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidValue(name)) if name == "DB_MAX_CONNECTIONS"
        ));
    }

    #[test]
    fn test_bad_bind_addr() {
        let config = config_from(&[("BIND_ADDR", "not an address")]).unwrap();
        assert!(config.socket_addr().is_err());
    }
}
