//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sitemaker_core::SitemapError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Sitemap could not be rendered.
    #[error("Render error: {0}")]
    Render(#[from] SitemapError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        let status = match &self {
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
