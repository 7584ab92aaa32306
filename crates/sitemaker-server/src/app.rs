//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `path` - Route serving the sitemap (e.g. `/sitemap.xml`)
pub(crate) fn create_router(state: Arc<AppState>, path: &str) -> Router {
    Router::new()
        .route(path, get(handlers::sitemap::get_sitemap))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer()),
        )
        .with_state(state)
}
