//! Forecast Routes

use axum::{extract::State, Json};
use std::sync::Arc;
use storage::Forecast;
use tracing::info;

use crate::error::ApiError;
use crate::generator::generate_batch;
use crate::AppState;

/// List all forecasts, latest date first
pub async fn list_forecasts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Forecast>>, ApiError> {
    let forecasts = state.repository.list().await?;
    Ok(Json(forecasts))
}

/// Generate and persist one batch of forecasts starting tomorrow
pub async fn generate_forecasts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Forecast>>, ApiError> {
    let today = (state.clock)();
    let batch = generate_batch(today, &mut rand::thread_rng());

    let forecasts = state.repository.insert_batch(&batch).await?;
    info!(%today, count = forecasts.len(), "Generated forecasts");

    Ok(Json(forecasts))
}
