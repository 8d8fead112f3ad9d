//! Buffered HTTP response.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};

use crate::error::TransportError;
use crate::http::RawResponse;
use crate::request::JsonTarget;

/// A received response with its body fully read.
///
/// A `Default` response stands for "no response attached": status code 0,
/// empty status line, empty body.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status_code: u16,
    status: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let line = match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };
        Self {
            status_code: status.as_u16(),
            status: line,
            headers,
            body: body.into(),
        }
    }

    /// Drain `raw`'s body and release it.
    ///
    /// The raw response is consumed, so its underlying connection is freed
    /// whether or not the read succeeds.
    pub(crate) async fn read(raw: RawResponse) -> Result<Self, TransportError> {
        let RawResponse {
            status,
            headers,
            mut body,
        } = raw;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next_chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(Self::new(status, headers, buf.freeze()))
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Status line such as `"200 OK"`.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }

    /// Decode the body into `target`. An empty body leaves `target` as is.
    pub fn decode_into<T: JsonTarget + ?Sized>(&self, target: &mut T) -> serde_json::Result<()> {
        if self.body.is_empty() {
            return Ok(());
        }
        target.write_json(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FullBody;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Sample {
        #[serde(default)]
        ex: String,
    }

    fn with_status(code: u16) -> Response {
        Response::new(StatusCode::from_u16(code).unwrap(), HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn default_response_is_empty() {
        let response = Response::default();
        assert_eq!(response.body(), b"");
        assert_eq!(response.status(), "");
        assert_eq!(response.status_code(), 0);
        assert!(!response.is_success());
        assert!(!response.is_error());
    }

    #[test]
    fn status_line_includes_reason() {
        assert_eq!(with_status(200).status(), "200 OK");
        assert_eq!(with_status(404).status(), "404 Not Found");
        assert_eq!(with_status(599).status(), "599");
    }

    #[test]
    fn classification_covers_every_code() {
        for code in 100..=999u16 {
            let response = with_status(code);
            assert_eq!(response.is_success(), (200..=299).contains(&code), "{code}");
            assert_eq!(response.is_error(), code >= 400, "{code}");
        }
    }

    #[test]
    fn redirects_and_informational_are_unclassified() {
        for code in [100, 101, 199, 300, 301, 304, 399] {
            let response = with_status(code);
            assert!(!response.is_success(), "{code}");
            assert!(!response.is_error(), "{code}");
        }
    }

    #[test]
    fn decode_empty_body_is_noop() {
        let response = with_status(204);
        let mut target = Sample::default();
        response.decode_into(&mut target).unwrap();
        assert_eq!(target, Sample::default());
    }

    #[test]
    fn decode_fills_target() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), r#"{"ex":"test"}"#);
        let mut target = Sample::default();
        response.decode_into(&mut target).unwrap();
        assert_eq!(target.ex, "test");
    }

    #[test]
    fn decode_malformed_body_fails() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), "{'},");
        let mut target = Sample::default();
        assert!(response.decode_into(&mut target).is_err());
    }

    #[tokio::test]
    async fn read_buffers_the_whole_body() {
        let raw = RawResponse::new(StatusCode::OK, HeaderMap::new(), FullBody::new("sample body"));
        let response = Response::read(raw).await.unwrap();
        assert_eq!(response.body(), b"sample body");
        assert!(response.is_success());
    }
}
