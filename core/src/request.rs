//! Request description and its fluent builder.
//!
//! # Design
//! A `Request` is plain data: it says *what* to send, never *where* or *how*.
//! The transport resolves it against its base URL and turns it into an
//! `HttpRequest` at send time, so malformed paths or methods surface there as
//! build errors rather than here.
//!
//! The body and the decode targets are type-erased (`JsonBody`,
//! `JsonTarget`) so one `Request` type carries any serializable payload and
//! writes into any caller-owned deserializable value.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::BuildError;
use crate::http::HttpRequest;

const JSON: &str = "application/json";

/// A value that can be written as a JSON request body.
pub trait JsonBody {
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T: Serialize + ?Sized> JsonBody for T {
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A caller-owned value that a JSON response body is decoded into.
pub trait JsonTarget {
    fn write_json(&mut self, bytes: &[u8]) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned> JsonTarget for T {
    fn write_json(&mut self, bytes: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// A single API call, consumed by `Transport::send`.
pub struct Request<'a> {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: BTreeMap<String, String>,
    pub(crate) body: Option<Box<dyn JsonBody + Send + 'a>>,
    pub(crate) result: Option<&'a mut (dyn JsonTarget + Send)>,
    pub(crate) error: Option<&'a mut (dyn JsonTarget + Send)>,
    pub(crate) context: Option<CancellationToken>,
}

impl<'a> Request<'a> {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn has_result_target(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_error_target(&self) -> bool {
        self.error.is_some()
    }

    /// The cancellation token of this request, or a fresh token that is never
    /// cancelled when none was set.
    pub fn context(&self) -> CancellationToken {
        self.context.clone().unwrap_or_default()
    }

    /// Resolve against `base_url` and serialize the body.
    ///
    /// The query map replaces any query carried by the base URL. The
    /// `User-Agent` header is left to the transport.
    pub(crate) fn to_http_request(&self, base_url: &Url) -> Result<HttpRequest, BuildError> {
        let mut url = base_url.join(&self.path)?;
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&self.query);
        }

        let body = match &self.body {
            Some(body) => Some(Bytes::from(body.to_json().map_err(BuildError::Body)?)),
            None => None,
        };

        let method = Method::from_bytes(self.method.as_bytes())?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.has_body())
            .finish_non_exhaustive()
    }
}

/// Fluent builder for `Request`.
///
/// Every method consumes the builder and returns the updated one, so a
/// partially configured builder can never be changed behind a caller's back.
pub struct RequestBuilder<'a> {
    method: String,
    path: Vec<String>,
    query: BTreeMap<String, String>,
    body: Option<Box<dyn JsonBody + Send + 'a>>,
    result: Option<&'a mut (dyn JsonTarget + Send)>,
    error: Option<&'a mut (dyn JsonTarget + Send)>,
    context: Option<CancellationToken>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: Vec::new(),
            query: BTreeMap::new(),
            body: None,
            result: None,
            error: None,
            context: None,
        }
    }

    /// Append a path segment; segments are joined with `/` on `build`.
    pub fn path(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Set a query parameter, replacing any earlier value for `key`.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn body<B: Serialize + Send + 'a>(mut self, body: B) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Decode a 2xx response body into `target`.
    pub fn result_into<T: JsonTarget + Send>(mut self, target: &'a mut T) -> Self {
        self.result = Some(target as &'a mut (dyn JsonTarget + Send));
        self
    }

    /// Decode a 4xx/5xx response body into `target`.
    pub fn error_into<T: JsonTarget + Send>(mut self, target: &'a mut T) -> Self {
        self.error = Some(target as &'a mut (dyn JsonTarget + Send));
        self
    }

    pub fn context(mut self, token: CancellationToken) -> Self {
        self.context = Some(token);
        self
    }

    pub fn build(self) -> Request<'a> {
        Request {
            method: self.method,
            path: self.path.join("/"),
            query: self.query,
            body: self.body,
            result: self.result,
            error: self.error,
            context: self.context,
        }
    }
}
