//! Application state.
//!
//! Shared state for all request handlers.

use sitemaker_core::Sitemap;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Sitemap rendered on every request.
    pub(crate) sitemap: Sitemap,
}
