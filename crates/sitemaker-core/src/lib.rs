//! Sitemap object model and XML serializer.
//!
//! This crate builds [sitemaps.org](https://www.sitemaps.org/protocol.html)
//! documents from an ordered list of URL entries. Two types form the core API:
//!
//! - [`Url`]: A page location with optional change frequency, priority and
//!   last modification hints
//! - [`Sitemap`]: Ordered collection of [`Url`]s with output sinks
//!
//! # Output Sinks
//!
//! - [`Sitemap::get`]: Rendered XML as a `String`
//! - [`Sitemap::stream`]: Rendered XML written through a [`ResponseWriter`]
//! - [`Sitemap::save`]: Rendered XML written to a file
//!
//! # Example
//!
//! ```
//! use sitemaker_core::{ChangeFrequency, Sitemap, Url, priority};
//!
//! let mut sitemap = Sitemap::new();
//! sitemap
//!     .add(Url::new("https://example.com/")?.with_priority(priority::MAX))
//!     .add(Url::new("https://example.com/blog")?.with_change_frequency(ChangeFrequency::Daily));
//!
//! let xml = sitemap.get()?;
//! assert!(xml.contains("<loc>https://example.com/blog</loc><changefreq>daily</changefreq>"));
//! # Ok::<(), sitemaker_core::SitemapError>(())
//! ```

mod error;
pub mod lastmod;
mod response;
mod sitemap;
mod url;

pub use error::SitemapError;
pub use response::{BufferedResponse, CONTENT_TYPE, ResponseWriter};
pub use sitemap::{DEFAULT_TIMEZONE, SITEMAP_NAMESPACE, Sitemap};
pub use url::{ChangeFrequency, Url, priority};
