//! Web client configuration

use config::{ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

/// API base address used when `API_BASE_URL` is unset
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";

/// Upstream request timeout (seconds)
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 100;

/// Hosting environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    /// Error pages include diagnostics
    #[serde(alias = "Development")]
    Development,
    /// Error pages are generic
    #[default]
    #[serde(alias = "Production")]
    Production,
}

impl AppEnvironment {
    pub fn is_development(&self) -> bool {
        matches!(self, AppEnvironment::Development)
    }
}

/// Web client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Base address of the forecast API (`API_BASE_URL`)
    pub api_base_url: String,
    /// Listen address (`BIND_ADDR`)
    pub bind_addr: String,
    /// `APP_ENVIRONMENT`: development or production
    pub app_environment: AppEnvironment,
    /// Upstream request timeout (`API_TIMEOUT_SECS`)
    pub api_timeout_secs: u64,
}

impl WebConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::default().try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("app_environment", "production")?
            .set_default("api_timeout_secs", DEFAULT_API_TIMEOUT_SECS)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        reqwest::Url::parse(&config.api_base_url).map_err(|e| {
            ConfigError::Message(format!(
                "API_BASE_URL {:?} is not a valid URL: {}",
                config.api_base_url, e
            ))
        })?;

        Ok(config)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Config pointing at `api_base_url` with every other value defaulted
    pub fn for_api(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            app_environment: AppEnvironment::default(),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.app_environment = environment;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().try_parsing(true).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = WebConfig::from_env(env(&[])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.bind_addr, "0.0.0.0:80");
        assert_eq!(config.app_environment, AppEnvironment::Production);
        assert_eq!(config.api_timeout(), Duration::from_secs(100));
    }

    #[test]
    fn test_environment_overrides() {
        let config = WebConfig::from_env(env(&[
            ("API_BASE_URL", "http://api:80"),
            ("APP_ENVIRONMENT", "development"),
            ("API_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://api:80");
        assert!(config.app_environment.is_development());
        assert_eq!(config.api_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_capitalized_environment_name() {
        let config = WebConfig::from_env(env(&[("APP_ENVIRONMENT", "Development")])).unwrap();
        assert!(config.app_environment.is_development());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(WebConfig::from_env(env(&[("API_BASE_URL", "not a url")])).is_err());
        assert!(WebConfig::from_env(env(&[("APP_ENVIRONMENT", "staging")])).is_err());
    }
}
