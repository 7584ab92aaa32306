//! Error types for sitemap construction and output.

use std::path::PathBuf;

/// Error raised while building or emitting a sitemap.
///
/// Variants fall into two classes, see [`SitemapError::is_invalid_input`] and
/// [`SitemapError::is_io`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SitemapError {
    /// Location does not start with `scheme://`.
    #[error("invalid URL location: {0:?}")]
    InvalidLocation(String),

    /// Last modification value could not be parsed as a date/time.
    #[error("invalid lastmod value: {0:?}")]
    InvalidDate(String),

    /// Timezone name is not in the IANA timezone database.
    #[error("unknown timezone: {0:?}")]
    UnknownTimezone(String),

    /// Writing the rendered sitemap to disk failed.
    #[error("failed to save sitemap to {}", path.display())]
    Save {
        /// Target file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// XML writer error.
    #[error("XML write error")]
    Write(#[from] std::io::Error),
}

impl SitemapError {
    /// Whether the error was caused by caller-supplied input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidLocation(_) | Self::InvalidDate(_) | Self::UnknownTimezone(_)
        )
    }

    /// Whether the error was caused by a failed write.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Save { .. } | Self::Write(_))
    }
}
