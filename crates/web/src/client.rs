//! HTTP client for web → API communication.

use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::WebError;

const LIST_PATH: &str = "weatherforecast";
const GENERATE_PATH: &str = "weatherforecast/generate";

/// Forecast as the web client sees it; unknown fields are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Client for the forecast API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    list_url: Url,
    generate_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WebError> {
        let invalid = |reason: String| WebError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        // Without a trailing slash, joining would replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let list_url = base.join(LIST_PATH).map_err(|e| invalid(e.to_string()))?;
        let generate_url = base.join(GENERATE_PATH).map_err(|e| invalid(e.to_string()))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            list_url,
            generate_url,
        })
    }

    /// Fetch all forecasts via GET /weatherforecast.
    ///
    /// A `null` body yields an empty list.
    pub async fn list_forecasts(&self) -> Result<Vec<Forecast>, WebError> {
        let response = self.client.get(self.list_url.clone()).send().await?;
        check_status(&self.list_url, response.status())?;

        let forecasts: Option<Vec<Forecast>> = response.json().await?;
        let forecasts = forecasts.unwrap_or_default();

        debug!(count = forecasts.len(), "Fetched forecasts");
        Ok(forecasts)
    }

    /// Ask the API for a new batch via POST /weatherforecast/generate.
    ///
    /// The response body is discarded.
    pub async fn generate_forecasts(&self) -> Result<(), WebError> {
        let response = self.client.post(self.generate_url.clone()).send().await?;
        check_status(&self.generate_url, response.status())?;

        debug!("Requested forecast generation");
        Ok(())
    }

    #[cfg(test)]
    fn list_url(&self) -> &Url {
        &self.list_url
    }

    #[cfg(test)]
    fn generate_url(&self) -> &Url {
        &self.generate_url
    }
}

fn check_status(url: &Url, status: reqwest::StatusCode) -> Result<(), WebError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(WebError::UpstreamStatus {
            endpoint: url.to_string(),
            status,
        })
    }
}
