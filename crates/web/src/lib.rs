//! Weather Forecast Web Client
//!
//! Server-rendered HTML front end. Every page load fetches the forecast list
//! fresh from the API; the generate form relays a command to the API and
//! redirects back to the list.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod client;
pub mod config;
pub mod error;
mod routes;
pub mod views;

pub use client::{ApiClient, Forecast};
pub use crate::config::{AppEnvironment, WebConfig};
pub use error::{ErrorPage, WebError};
pub use service::init_logging;

use error::FALLBACK_ERROR_HTML;
use service::shutdown_signal;
use views::Views;

/// Application state shared across handlers
pub struct AppState {
    pub config: WebConfig,
    pub api: ApiClient,
    pub views: Views,
}

impl AppState {
    pub fn new(config: WebConfig) -> Result<Self, WebError> {
        let api = ApiClient::new(&config.api_base_url, config.api_timeout())?;
        let views = Views::new()?;

        Ok(Self { config, api, views })
    }

    /// Log `error` and turn it into a 500 page.
    ///
    /// Diagnostics are included only in development.
    pub fn error_page(&self, error: WebError) -> ErrorPage {
        let request_id = uuid::Uuid::new_v4().to_string();
        error!(%request_id, error = %error, "Request failed");

        let detail = self
            .config
            .app_environment
            .is_development()
            .then(|| error.chain());

        let html = self
            .views
            .error(Some(&request_id), detail.as_deref())
            .unwrap_or_else(|e| {
                error!(%request_id, error = %e, "Failed to render error page");
                FALLBACK_ERROR_HTML.to_string()
            });

        ErrorPage {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            html,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/Home", get(routes::index))
        .route("/Home/Index", get(routes::index))
        .route("/Home/Generate", post(routes::generate))
        .route("/Home/Error", get(routes::error))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(config: WebConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.bind_addr.clone();

    info!(
        api_base_url = %config.api_base_url,
        environment = ?config.app_environment,
        "Initializing web client"
    );
    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state);

    info!("Starting web server on {}", bind_addr);

    let listener = TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}
