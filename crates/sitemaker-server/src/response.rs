//! [`ResponseWriter`] backed by an axum response.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use sitemaker_core::ResponseWriter;

/// Collects headers and body, then produces a `200 OK` axum [`Response`].
///
/// Headers with invalid names or values are dropped with a warning.
#[derive(Debug, Default)]
pub struct AxumResponse {
    headers: HeaderMap,
    body: Vec<u8>,
}

impl AxumResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseWriter for AxumResponse {
    type Output = Response;

    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(header = name, "Dropping invalid response header"),
        }
    }

    fn write_body(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }

    fn end(self) -> Response {
        // `Response::new` is 200 OK with no headers; only what was set is sent.
        let mut response = Response::new(Body::from(self.body));
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};

    #[test]
    fn test_end_builds_response() {
        let mut writer = AxumResponse::new();
        writer.set_header("Content-Type", "application/xml; charset=UTF-8");
        writer.write_body(b"<urlset/>");

        let response = writer.end();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml; charset=UTF-8"
        );
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let mut writer = AxumResponse::new();
        writer.set_header("bad header", "value");
        writer.set_header("x-ok", "line\nbreak");

        assert!(writer.end().headers().is_empty());
    }

    #[test]
    fn test_end_adds_no_implicit_content_type() {
        let mut writer = AxumResponse::new();
        writer.write_body(b"<urlset/>");

        let response = writer.end();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
        assert!(response.headers().is_empty());
    }
}
