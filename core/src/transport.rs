//! Base transport: turns a `Request` into a `Response`.
//!
//! # Design
//! `BaseClient` owns the configuration shared by every call (base URL, user
//! agent, timeout, HTTP dependency) and nothing else, so one instance can
//! serve concurrent sends. `send` runs four phases and reports the failing
//! one through the `Error` variant: build, transport (which covers the
//! dependency call and the body read, both under the deadline), then parse.
//! Resource clients depend on the `Transport` trait rather than on
//! `BaseClient` directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::header::{HeaderValue, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::error::{Error, TransportError};
use crate::http::{HttpClient, HttpRequest};
use crate::request::Request;
use crate::response::Response;

/// Deadline applied when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Sends requests and classifies their responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<'_>) -> Result<Response, Error>;
}

#[derive(Clone)]
pub struct BaseClient {
    base_url: Url,
    user_agent: String,
    timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
}

impl BaseClient {
    pub fn new(base_url: Url, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url,
            user_agent: String::new(),
            timeout_ms: 0,
            http_client,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// `0` means "use `DEFAULT_TIMEOUT`".
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }

    async fn round_trip(&self, outbound: HttpRequest) -> Result<Response, TransportError> {
        let raw = self.http_client.execute(outbound).await?;
        Response::read(raw).await
    }
}

impl std::fmt::Debug for BaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for BaseClient {
    async fn send(&self, mut request: Request<'_>) -> Result<Response, Error> {
        let mut outbound = request.to_http_request(&self.base_url)?;
        if !self.user_agent.is_empty() {
            outbound.headers.insert(
                USER_AGENT,
                HeaderValue::from_str(&self.user_agent).map_err(crate::error::BuildError::from)?,
            );
        }

        let timeout = self.effective_timeout();
        let context = request.context();
        debug!(method = %outbound.method, url = %outbound.url, ?timeout, "sending request");

        let response = tokio::select! {
            biased;
            _ = context.cancelled() => return Err(TransportError::Cancelled.into()),
            result = tokio::time::timeout(timeout, self.round_trip(outbound)) => {
                result.map_err(|_| TransportError::Timeout(timeout))??
            }
        };
        debug!(status = response.status_code(), bytes = response.body().len(), "received response");

        if response.is_success() {
            if let Some(target) = request.result.as_deref_mut() {
                response.decode_into(target).map_err(Error::Parse)?;
            }
        } else if response.is_error() {
            if let Some(target) = request.error.as_deref_mut() {
                response.decode_into(target).map_err(Error::Parse)?;
            }
        }

        Ok(response)
    }
}
