//! Page Routes

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use std::sync::Arc;

use crate::error::ErrorPage;
use crate::AppState;

/// Render the forecast list
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ErrorPage> {
    let forecasts = state
        .api
        .list_forecasts()
        .await
        .map_err(|e| state.error_page(e))?;

    let html = state.views.index(&forecasts).map_err(|e| state.error_page(e))?;
    Ok(Html(html))
}

/// Ask the API for a new batch, then send the browser back to the list
pub async fn generate(State(state): State<Arc<AppState>>) -> Result<Redirect, ErrorPage> {
    state
        .api
        .generate_forecasts()
        .await
        .map_err(|e| state.error_page(e))?;

    Ok(Redirect::to("/"))
}

/// Generic error page
pub async fn error(State(state): State<Arc<AppState>>) -> Result<Html<String>, ErrorPage> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let html = state
        .views
        .error(Some(&request_id), None)
        .map_err(|e| state.error_page(e))?;

    Ok(Html(html))
}
