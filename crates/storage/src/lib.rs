//! Storage Layer
//!
//! Provides SQLite persistence for forecast records with repository pattern.
//! Forecasts are append-only: the repository exposes listing and batch
//! insertion, nothing else.

mod repository;
mod retry;

pub use repository::{Forecast, ForecastRepository, NewForecast};
pub use retry::{is_transient, with_retry, RetryPolicy};

use std::time::Duration;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

/// Store connection configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx SQLite URL, e.g. `sqlite://forecasts.db?mode=rwc`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection, per attempt
    pub acquire_timeout: Duration,
    /// Reconnect policy for transient failures
    pub retry: RetryPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://forecasts.db?mode=rwc".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Create config for the given database URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Single-connection in-memory store (for testing)
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            retry: RetryPolicy::new(0, Duration::ZERO),
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
