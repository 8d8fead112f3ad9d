//! Deterministic `HttpClient` for tests.
//!
//! Replays queued replies in order and records every outbound request, so a
//! test can assert both on what was sent and on how many times the
//! dependency was reached.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

use crate::error::TransportError;
use crate::http::{FullBody, HttpClient, HttpRequest, RawResponse, ResponseBody};

#[derive(Debug, Clone)]
enum Outcome {
    Respond {
        status: u16,
        headers: HeaderMap,
        body: Bytes,
        broken_body: bool,
    },
    Fail(String),
}

/// One scripted answer of a `MockHttpClient`.
#[derive(Debug, Clone)]
pub struct MockReply {
    outcome: Outcome,
    delay: Option<Duration>,
    body_delay: Option<Duration>,
}

impl MockReply {
    /// A response with a JSON body.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::respond(status, headers, body.into(), false)
    }

    /// A response with no body.
    pub fn empty(status: u16) -> Self {
        Self::respond(status, HeaderMap::new(), Bytes::new(), false)
    }

    /// A response whose body fails while being read.
    pub fn broken_body(status: u16) -> Self {
        Self::respond(status, HeaderMap::new(), Bytes::new(), true)
    }

    /// The dependency fails without producing a response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            delay: None,
            body_delay: None,
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer at once, but wait `delay` before yielding the body.
    pub fn with_body_delay(mut self, delay: Duration) -> Self {
        self.body_delay = Some(delay);
        self
    }

    fn respond(status: u16, headers: HeaderMap, body: Bytes, broken_body: bool) -> Self {
        Self {
            outcome: Outcome::Respond {
                status,
                headers,
                body,
                broken_body,
            },
            delay: None,
            body_delay: None,
        }
    }
}

struct BrokenBody;

struct SlowBody {
    delay: Option<Duration>,
    inner: FullBody,
}

#[async_trait]
impl ResponseBody for SlowBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        if let Some(delay) = self.delay.take() {
            tokio::time::sleep(delay).await;
        }
        self.inner.next_chunk().await
    }
}

#[async_trait]
impl ResponseBody for BrokenBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        Err(TransportError::other("connection reset while reading body"))
    }
}

#[derive(Debug, Default)]
pub struct MockHttpClient {
    replies: Mutex<VecDeque<MockReply>>,
    recorded: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply; replies are consumed in the order they were added.
    pub fn with_reply(self, reply: MockReply) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    /// Every request received so far.
    pub fn recorded(&self) -> Vec<HttpRequest> {
        lock(&self.recorded).clone()
    }

    /// Number of times `execute` was called.
    pub fn calls(&self) -> usize {
        lock(&self.recorded).len()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        lock(&self.recorded).push(request);
        let reply = lock(&self.replies)
            .pop_front()
            .ok_or_else(|| TransportError::other("no mock reply queued"))?;

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.outcome {
            Outcome::Fail(message) => Err(TransportError::other(message)),
            Outcome::Respond {
                status,
                headers,
                body,
                broken_body,
            } => {
                let status = StatusCode::from_u16(status).map_err(TransportError::other)?;
                if broken_body {
                    return Ok(RawResponse::new(status, headers, BrokenBody));
                }
                let body = SlowBody {
                    delay: reply.body_delay,
                    inner: FullBody::new(body),
                };
                Ok(RawResponse::new(status, headers, body))
            }
        }
    }
}
