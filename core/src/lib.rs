//! Async client for the organisation accounts API.
//!
//! # Overview
//! A small, generic HTTP pipeline with one resource client on top:
//! `RequestBuilder` describes a call, `BaseClient` (the `Transport`) resolves
//! it against the configured base URL and runs it through an injectable
//! `HttpClient` under a deadline, and `Response` holds the buffered result.
//! `Accounts` maps fetch/create/delete onto that pipeline.
//!
//! # Design
//! - Request construction is separated from transport: a `Request` is plain
//!   data, validated only when the transport turns it into an `HttpRequest`.
//! - The transport decodes the body into a caller-supplied target, picked by
//!   status class (2xx → result, 4xx/5xx → error). The library owns no
//!   response schemas beyond the account DTOs in `types`.
//! - Errors name the phase that failed: config, build, transport, parse, or
//!   an unexpected status (`Error::Client`).
//! - `HttpClient` is the seam for tests; `mock::MockHttpClient` (behind the
//!   `test-support` feature) is a deterministic fake, `ReqwestClient` the
//!   real thing.
//!
//! ```no_run
//! # async fn run() -> Result<(), account_api::Error> {
//! use account_api::{CancellationToken, Client};
//!
//! let client = Client::builder()
//!     .base_url("http://localhost:8080/")
//!     .timeout_ms(1000)
//!     .build()?;
//! let id = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc".parse().expect("uuid");
//! let account = client.accounts().fetch(id, &CancellationToken::new()).await?;
//! println!("{:?}", account.data.version);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod client;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use accounts::Accounts;
pub use client::{Client, ClientBuilder};
pub use error::{BuildError, ClientError, ConfigError, Error, TransportError};
pub use self::http::{FullBody, HttpClient, HttpRequest, RawResponse, ReqwestClient, ResponseBody};
pub use request::{JsonBody, JsonTarget, Request, RequestBuilder};
pub use response::Response;
pub use tokio_util::sync::CancellationToken;
pub use transport::{BaseClient, Transport, DEFAULT_TIMEOUT};
pub use types::{AccountAttributes, AccountData, AccountRequest, AccountResponse, ApiError, Links};
