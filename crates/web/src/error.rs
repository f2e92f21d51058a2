use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Served when the error view itself cannot be rendered
pub const FALLBACK_ERROR_HTML: &str = "<!DOCTYPE html><html><head><title>Error</title></head>\
<body><h1>Error.</h1><p>An error occurred while processing your request.</p></body></html>";

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("API request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("API returned {status} for {endpoint}")]
    UpstreamStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl WebError {
    /// Message plus every underlying cause, one per line
    pub fn chain(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut source = std::error::Error::source(self);

        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        lines.join("\n")
    }
}

/// Rendered error view returned from page handlers
#[derive(Debug)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub html: String,
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.status, Html(self.html)).into_response()
    }
}
