//! The HTTP dependency seam.
//!
//! # Design
//! `HttpClient` is the single capability the transport needs from the
//! outside world: execute one outbound message and hand back the raw
//! response. Everything above it (URL resolution, headers, deadlines, body
//! decoding) lives in the transport, so a test can swap in a fake without a
//! live network. `ReqwestClient` is the production implementation.
//!
//! The response body is exposed as a chunk source instead of a buffer so the
//! transport decides when (and under which deadline) it is read.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::TransportError;

/// An outbound HTTP message, fully resolved and ready to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// `None` when the request carries no body.
    pub body: Option<Bytes>,
}

/// Source of response body chunks. `Ok(None)` marks the end of the body.
#[async_trait]
pub trait ResponseBody: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// A body that is already fully in memory.
#[derive(Debug, Default)]
pub struct FullBody(Option<Bytes>);

impl FullBody {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(Some(bytes.into()))
    }
}

#[async_trait]
impl ResponseBody for FullBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        Ok(self.0.take().filter(|b| !b.is_empty()))
    }
}

/// A response as returned by an `HttpClient`, before the body is read.
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// A response whose body is already buffered.
    pub fn full(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, HeaderMap::new(), FullBody::new(body))
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Capability to execute an outbound HTTP message.
///
/// Implementations should not apply their own timeouts: the transport races
/// every call against its deadline and the caller's cancellation token, and
/// drops the future when either fires.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// `HttpClient` backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

struct ReqwestBody(reqwest::Response);

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        Ok(self.0.chunk().await?)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;
        Ok(RawResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Box::new(ReqwestBody(response)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_body_yields_once() {
        let mut body = FullBody::new("abc");
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from("abc")));
        assert_eq!(body.next_chunk().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_full_body_yields_nothing() {
        let mut body = FullBody::new(Vec::new());
        assert_eq!(body.next_chunk().await.unwrap(), None);
    }

    #[test]
    fn raw_response_full_has_no_headers() {
        let raw = RawResponse::full(StatusCode::CREATED, "{}");
        assert_eq!(raw.status, StatusCode::CREATED);
        assert!(raw.headers.is_empty());
    }
}
