//! Sitemap builder and XML serializer.

use std::fs;
use std::io;
use std::path::Path;

use chrono_tz::Tz;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::response::{CONTENT_TYPE, ResponseWriter};
use crate::{SitemapError, Url, lastmod};

/// XML namespace of the `<urlset>` root element.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Timezone used by [`Sitemap::new`].
pub const DEFAULT_TIMEZONE: &str = "Africa/Maputo";

/// Ordered collection of [`Url`]s rendered as a sitemaps.org `<urlset>`.
///
/// Entries are rendered in insertion order. Rendering reads the entries as
/// they are at call time, so changes made through [`Sitemap::entries_mut`]
/// after [`Sitemap::add`] show up in the next [`Sitemap::get`].
///
/// The timezone is only used to anchor `<lastmod>` values that carry no UTC
/// offset. It is resolved lazily: an unknown name fails rendering only when
/// an entry actually has a last modification value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sitemap {
    entries: Vec<Url>,
    timezone: String,
}

impl Default for Sitemap {
    fn default() -> Self {
        Self::new()
    }
}

impl Sitemap {
    /// Create an empty sitemap using [`DEFAULT_TIMEZONE`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_timezone(DEFAULT_TIMEZONE)
    }

    /// Create an empty sitemap using the IANA timezone `timezone`.
    #[must_use]
    pub fn with_timezone(timezone: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            timezone: timezone.into(),
        }
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Append an entry. Returns `self` for chaining.
    pub fn add(&mut self, url: Url) -> &mut Self {
        self.entries.push(url);
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    /// Mutable access to already added entries.
    pub fn entries_mut(&mut self) -> &mut [Url] {
        &mut self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the sitemap XML.
    ///
    /// The document is a single line with no whitespace between elements.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if a `<lastmod>` value cannot be parsed
    /// or the timezone is unknown.
    pub fn get(&self) -> Result<String, SitemapError> {
        self.render()
    }

    /// Render the sitemap and send it as the complete body of `response`.
    ///
    /// Sets `Content-Type: application/xml; charset=UTF-8`, writes the XML and
    /// finishes the response. Nothing is written if rendering fails.
    ///
    /// # Errors
    ///
    /// Same as [`Sitemap::get`].
    pub fn stream<W: ResponseWriter>(&self, mut response: W) -> Result<W::Output, SitemapError> {
        let xml = self.render()?;
        response.set_header("Content-Type", CONTENT_TYPE);
        response.write_body(xml.as_bytes());
        Ok(response.end())
    }

    /// Render the sitemap and write it to `path`, replacing existing content.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::Save`] if the file cannot be written, or any
    /// error from [`Sitemap::get`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SitemapError> {
        let path = path.as_ref();
        let xml = self.render()?;
        fs::write(path, &xml).map_err(|source| SitemapError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = xml.len(), "Saved sitemap");
        Ok(())
    }

    fn render(&self) -> Result<String, SitemapError> {
        let mut writer = Writer::new(Vec::with_capacity(128 + self.entries.len() * 128));
        let mut tz: Option<Tz> = None;

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
        ))?;

        for url in &self.entries {
            writer.write_event(Event::Start(BytesStart::new("url")))?;
            write_text_element(&mut writer, "loc", url.location())?;

            if let Some(value) = present(url.last_modified()) {
                let zone = match tz {
                    Some(zone) => zone,
                    None => *tz.insert(lastmod::parse_timezone(&self.timezone)?),
                };
                write_text_element(&mut writer, "lastmod", &lastmod::normalize(value, zone)?)?;
            }
            if let Some(value) = present(url.change_frequency()) {
                write_text_element(&mut writer, "changefreq", value)?;
            }
            if let Some(value) = present(url.priority()) {
                write_text_element(&mut writer, "priority", value)?;
            }

            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        tracing::debug!(entries = self.entries.len(), "Rendered sitemap");
        String::from_utf8(writer.into_inner())
            .map_err(|e| SitemapError::Write(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

impl Extend<Url> for Sitemap {
    fn extend<I: IntoIterator<Item = Url>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Empty optional fields are treated as unset. Only `""` counts as empty:
/// a value of `"0"` is still emitted.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Write `<name>text</name>` with `text` escaped.
fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferedResponse, ChangeFrequency, priority};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;

    fn url(loc: &str) -> Url {
        Url::new(loc).unwrap()
    }

    #[test]
    fn test_empty_sitemap() {
        let sitemap = Sitemap::new();
        assert_eq!(sitemap.get().unwrap(), format!("{HEADER}</urlset>"));
        assert!(sitemap.is_empty());
    }

    #[test]
    fn test_default_timezone() {
        assert_eq!(Sitemap::new().timezone(), "Africa/Maputo");
        assert_eq!(Sitemap::default().timezone(), DEFAULT_TIMEZONE);
        assert_eq!(Sitemap::with_timezone("UTC").timezone(), "UTC");
    }

    #[test]
    fn test_full_entry() {
        let mut sitemap = Sitemap::new();
        sitemap.add(
            url("https://example.com/")
                .with_last_modified("2024-01-15 10:30:00")
                .with_change_frequency(ChangeFrequency::Daily)
                .with_priority(priority::MAX),
        );

        assert_eq!(
            sitemap.get().unwrap(),
            format!(
                "{HEADER}<url><loc>https://example.com/</loc>\
                 <lastmod>2024-01-15T10:30:00+02:00</lastmod>\
                 <changefreq>daily</changefreq>\
                 <priority>1.0</priority></url></urlset>"
            )
        );
    }

    #[test]
    fn test_insertion_order_and_sparse_fields() {
        let mut sitemap = Sitemap::new();
        sitemap
            .add(url("https://example.com/a").with_priority("0.8"))
            .add(url("https://example.com/b"))
            .add(url("https://example.com/c").with_change_frequency("monthly"));

        assert_eq!(
            sitemap.get().unwrap(),
            format!(
                "{HEADER}<url><loc>https://example.com/a</loc><priority>0.8</priority></url>\
                 <url><loc>https://example.com/b</loc></url>\
                 <url><loc>https://example.com/c</loc><changefreq>monthly</changefreq></url>\
                 </urlset>"
            )
        );
    }

    #[test]
    fn test_duplicates_are_rendered() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/")).add(url("https://example.com/"));

        let xml = sitemap.get().unwrap();
        assert_eq!(xml.matches("<loc>https://example.com/</loc>").count(), 2);
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let mut sitemap = Sitemap::new();
        sitemap.add(
            url("https://example.com/")
                .with_last_modified("")
                .with_change_frequency("")
                .with_priority(""),
        );

        assert_eq!(
            sitemap.get().unwrap(),
            format!("{HEADER}<url><loc>https://example.com/</loc></url></urlset>")
        );
    }

    #[test]
    fn test_zero_values_are_emitted() {
        let mut sitemap = Sitemap::new();
        sitemap.add(
            url("https://example.com/")
                .with_change_frequency("0")
                .with_priority("0"),
        );

        assert_eq!(
            sitemap.get().unwrap(),
            format!(
                "{HEADER}<url><loc>https://example.com/</loc>\
                 <changefreq>0</changefreq><priority>0</priority></url></urlset>"
            )
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/?a=1&b=<2>"));

        let xml = sitemap.get().unwrap();
        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=&lt;2&gt;</loc>"));
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/").with_last_modified("2024-01-15"));

        assert_eq!(sitemap.get().unwrap(), sitemap.get().unwrap());
    }

    #[test]
    fn test_mutation_after_add_is_rendered() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/").with_priority("0.1"));
        assert!(sitemap.get().unwrap().contains("<priority>0.1</priority>"));

        sitemap.entries_mut()[0].set_priority(priority::P09);

        let xml = sitemap.get().unwrap();
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(!xml.contains("<priority>0.1</priority>"));
    }

    #[test]
    fn test_timezone_applies_to_lastmod() {
        let mut sitemap = Sitemap::with_timezone("Asia/Tokyo");
        sitemap.add(url("https://example.com/").with_last_modified("2024-01-15 10:30:00"));

        assert!(
            sitemap
                .get()
                .unwrap()
                .contains("<lastmod>2024-01-15T10:30:00+09:00</lastmod>")
        );
    }

    #[test]
    fn test_unknown_timezone_fails_only_with_lastmod() {
        let mut sitemap = Sitemap::with_timezone("Nowhere/Special");
        sitemap.add(url("https://example.com/"));
        assert!(sitemap.get().is_ok());

        sitemap.add(url("https://example.com/news").with_last_modified("2024-01-15"));
        let err = sitemap.get().unwrap_err();
        assert!(matches!(err, SitemapError::UnknownTimezone(ref tz) if tz == "Nowhere/Special"));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_invalid_lastmod_fails() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/").with_last_modified("sometime"));

        let err = sitemap.get().unwrap_err();
        assert!(matches!(err, SitemapError::InvalidDate(ref v) if v == "sometime"));
    }

    #[test]
    fn test_extend() {
        let mut sitemap = Sitemap::new();
        sitemap.extend(["https://a.example", "https://b.example"].map(url));

        assert_eq!(sitemap.len(), 2);
        assert_eq!(sitemap.entries()[1].location(), "https://b.example");
    }

    #[test]
    fn test_stream_writes_header_and_body() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/"));

        let response = sitemap.stream(BufferedResponse::new()).unwrap();
        assert_eq!(
            response.header("content-type"),
            Some("application/xml; charset=UTF-8")
        );
        assert_eq!(response.body(), sitemap.get().unwrap().as_bytes());
    }

    #[test]
    fn test_stream_propagates_render_error() {
        let mut sitemap = Sitemap::new();
        sitemap.add(url("https://example.com/").with_last_modified("never"));

        let err = sitemap.stream(BufferedResponse::new()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_save_overwrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sitemap.xml");
        fs::write(&path, "stale content that is longer than an empty sitemap document").unwrap();

        let sitemap = Sitemap::new();
        sitemap.save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), sitemap.get().unwrap());
    }

    #[test]
    fn test_save_to_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("sitemap.xml");

        let err = Sitemap::new().save(&path).unwrap_err();
        assert!(err.is_io());
        assert!(!err.is_invalid_input());
        assert!(matches!(err, SitemapError::Save { path: ref p, .. } if *p == path));
    }
}
