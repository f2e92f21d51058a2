//! Weather Forecast API Server
//!
//! REST API that lists persisted forecasts and generates new batches of
//! random ones.

use axum::{
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod generator;
mod routes;

pub use crate::config::ApiConfig;
pub use error::ApiError;
pub use service::init_logging;

use service::shutdown_signal;
use storage::ForecastRepository;

/// Application state shared across handlers
pub struct AppState {
    /// Forecast store
    pub repository: ForecastRepository,
    /// Source of "today" for generated batches
    pub clock: fn() -> NaiveDate,
}

impl AppState {
    /// Create new application state using the local date
    pub fn new(repository: ForecastRepository) -> Self {
        Self {
            repository,
            clock: generator::local_today,
        }
    }

    /// Replace the date source
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/weatherforecast", get(routes::forecasts::list_forecasts))
        .route(
            "/weatherforecast/generate",
            post(routes::forecasts::generate_forecasts),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(config: ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let repository = ForecastRepository::new(&config.store_config())?;
    let state = Arc::new(AppState::new(repository.clone()));
    let app = create_router(state);

    info!("Starting API server on {}", config.bind_addr);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    info!("API server stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use crate::generator::{SUMMARIES, TEMPERATURE_RANGE_C};
    use serde_json::Value;
    use std::time::Duration;
    use storage::{Forecast, RetryPolicy, StoreConfig};
    use tower::ServiceExt;

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    async fn test_app() -> (Router, ForecastRepository) {
        let repository = ForecastRepository::connect(&StoreConfig::in_memory())
            .await
            .unwrap();
        let state = AppState::new(repository.clone()).with_clock(new_year);
        (create_router(Arc::new(state)), repository)
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn forecasts(value: Value) -> Vec<Forecast> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/weatherforecast").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_generate_creates_five_forecasts() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::POST, "/weatherforecast/generate").await;
        assert_eq!(status, StatusCode::OK);

        let created = forecasts(body);
        assert_eq!(created.len(), 5);

        let dates: Vec<_> = created.iter().map(|f| f.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-06"]
        );
        for forecast in &created {
            assert!(TEMPERATURE_RANGE_C.contains(&forecast.temperature_c));
            assert!(SUMMARIES.contains(&forecast.summary.as_str()));
        }
    }

    #[tokio::test]
    async fn test_generated_forecasts_are_listed_latest_first() {
        let (app, _) = test_app().await;

        let (_, body) = send(&app, Method::POST, "/weatherforecast/generate").await;
        let created = forecasts(body);
        send(&app, Method::POST, "/weatherforecast/generate").await;

        let (status, body) = send(&app, Method::GET, "/weatherforecast").await;
        assert_eq!(status, StatusCode::OK);

        let listed = forecasts(body);
        assert_eq!(listed.len(), 10);
        assert!(listed.windows(2).all(|pair| pair[0].date >= pair[1].date));
        for forecast in &created {
            assert!(listed.contains(forecast));
        }
    }

    #[tokio::test]
    async fn test_list_is_repeatable() {
        let (app, _) = test_app().await;
        send(&app, Method::POST, "/weatherforecast/generate").await;

        let (_, first) = send(&app, Method::GET, "/weatherforecast").await;
        let (_, second) = send(&app, Method::GET, "/weatherforecast").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_wire_format_field_names() {
        let (app, _) = test_app().await;

        let (_, body) = send(&app, Method::POST, "/weatherforecast/generate").await;
        let first = &body[0];

        assert!(first["id"].is_i64());
        assert_eq!(first["date"], "2024-01-02");
        assert!(first["temperatureC"].is_i64());
        assert!(first["summary"].is_string());
    }

    #[tokio::test]
    async fn test_unavailable_store_returns_server_error() {
        let (app, repository) = test_app().await;
        repository.close().await;

        let (status, body) = send(&app, Method::GET, "/weatherforecast").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, Method::POST, "/weatherforecast/generate").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unreachable_store_returns_server_error_after_retries() {
        let config = StoreConfig::new("sqlite:///nonexistent_dir/forecasts.db?mode=rwc")
            .with_acquire_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));
        let repository = ForecastRepository::new(&config).unwrap();
        let app = create_router(Arc::new(AppState::new(repository).with_clock(new_year)));

        let (status, body) = send(&app, Method::GET, "/weatherforecast").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Forecast store could not be reached");

        let (status, body) = send(&app, Method::POST, "/weatherforecast/generate").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Forecast store could not be reached");
    }

    #[tokio::test]
    async fn test_generate_requires_post() {
        let (app, _) = test_app().await;

        let req = Request::builder()
            .uri("/weatherforecast/generate")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
