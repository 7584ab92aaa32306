//! HTTP server for sitemaker.
//!
//! Serves a single route (default `/sitemap.xml`) that streams the configured
//! sitemap through [`Sitemap::stream`](sitemaker_core::Sitemap::stream).
//!
//! # Quick Start
//!
//! ```ignore
//! use sitemaker_core::{Sitemap, Url};
//! use sitemaker_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut sitemap = Sitemap::new();
//!     sitemap.add(Url::new("https://example.com/").unwrap());
//!
//!     run_server(ServerConfig::default(), sitemap).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod response;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use sitemaker_core::Sitemap;
use state::AppState;

pub use error::ServerError;
pub use response::AxumResponse;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Route serving the sitemap.
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            path: "/sitemap.xml".to_owned(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `sitemap` - Sitemap served on `config.path`
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    sitemap: Sitemap,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { sitemap });
    let app = app::create_router(state, &config.path);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, path = %config.path, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from sitemaker config.
#[must_use]
pub fn server_config_from_config(config: &sitemaker_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        path: config.server.path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemaker_config::Config;

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.server.host = "0.0.0.0".to_owned();
        config.server.port = 8081;
        config.server.path = "/maps/sitemap.xml".to_owned();

        let server_config = server_config_from_config(&config);
        assert_eq!(server_config.host, "0.0.0.0");
        assert_eq!(server_config.port, 8081);
        assert_eq!(server_config.path, "/maps/sitemap.xml");
    }
}
