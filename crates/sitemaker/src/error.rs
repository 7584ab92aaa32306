//! CLI error types.

use sitemaker_config::ConfigError;
use sitemaker_core::SitemapError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Sitemap(#[from] SitemapError),

    #[error("{0}")]
    Server(String),
}
