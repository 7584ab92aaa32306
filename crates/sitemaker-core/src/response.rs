//! Response sink used by [`Sitemap::stream`](crate::Sitemap::stream).

/// Content type sent with streamed sitemaps.
pub const CONTENT_TYPE: &str = "application/xml; charset=UTF-8";

/// Write side of an HTTP response.
///
/// The hosting server owns the request lifecycle. [`ResponseWriter::end`]
/// consumes the writer, so nothing can be emitted after the response is
/// finished.
pub trait ResponseWriter {
    /// Value produced when the response is finished.
    type Output;

    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: &str, value: &str);

    /// Append bytes to the response body.
    fn write_body(&mut self, body: &[u8]);

    /// Finish the response.
    fn end(self) -> Self::Output;
}

/// In-memory [`ResponseWriter`] that records headers and body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl ResponseWriter for BufferedResponse {
    type Output = Self;

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    fn write_body(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }

    fn end(self) -> Self {
        self
    }
}
