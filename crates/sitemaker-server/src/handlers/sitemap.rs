//! Sitemap endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;

use crate::error::ServerError;
use crate::response::AxumResponse;
use crate::state::AppState;

/// Handle GET on the sitemap route.
pub(crate) async fn get_sitemap(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let response = state.sitemap.stream(AxumResponse::new())?;
    tracing::debug!(entries = state.sitemap.len(), "Served sitemap");
    Ok(response)
}
