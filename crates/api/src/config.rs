//! API service configuration
//!
//! Read once from the process environment at startup.

use config::{ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;
use storage::{RetryPolicy, StoreConfig};

/// Default database URL when `DB_CONNECTION_STRING` is unset
pub const DEFAULT_CONNECTION_STRING: &str = "sqlite://forecasts.db?mode=rwc";

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";

/// API service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// sqlx database URL (`DB_CONNECTION_STRING`)
    pub db_connection_string: String,
    /// Listen address (`BIND_ADDR`)
    pub bind_addr: String,
    /// Reconnect attempts (`DB_MAX_RETRIES`)
    pub db_max_retries: u32,
    /// Fixed delay between reconnect attempts (`DB_RETRY_DELAY_SECS`)
    pub db_retry_delay_secs: u64,
    /// Pool size (`DB_MAX_CONNECTIONS`)
    pub db_max_connections: u32,
    /// Per-attempt bound on acquiring a connection (`DB_ACQUIRE_TIMEOUT_SECS`)
    pub db_acquire_timeout_secs: u64,
}

impl ApiConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::default().try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .set_default("db_connection_string", DEFAULT_CONNECTION_STRING)?
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("db_max_retries", 5)?
            .set_default("db_retry_delay_secs", 10)?
            .set_default("db_max_connections", 5)?
            .set_default("db_acquire_timeout_secs", 30)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if config.db_connection_string.trim().is_empty() {
            return Err(ConfigError::Message(
                "DB_CONNECTION_STRING must not be empty".to_string(),
            ));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::Message(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Store settings derived from this config
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.db_connection_string.clone())
            .with_max_connections(self.db_max_connections)
            .with_acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .with_retry(RetryPolicy::new(
                self.db_max_retries,
                Duration::from_secs(self.db_retry_delay_secs),
            ))
    }
}
