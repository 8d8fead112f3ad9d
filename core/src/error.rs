//! Error types for the account API client.
//!
//! # Design
//! Every failure is tagged with the phase that produced it so callers (and
//! tests) can tell them apart: configuring the client, building the outbound
//! request, moving bytes over the wire, decoding the body, or receiving a
//! status code the resource operation did not expect. Only resource
//! operations produce `Error::Client`; the transport never does.

use std::time::Duration;

use crate::response::Response;

/// Boxed error used for failures reported by custom HTTP dependencies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Any failure returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error when creating client: {0}")]
    Config(#[from] ConfigError),

    #[error("error while creating http request: {0}")]
    Build(#[from] BuildError),

    #[error("error while executing http request: {0}")]
    Transport(#[from] TransportError),

    #[error("error while parsing http response body: {0}")]
    Parse(#[source] serde_json::Error),

    #[error(transparent)]
    Client(Box<ClientError>),
}

impl Error {
    /// The `ClientError` carried by this error, if the server answered with an
    /// unexpected status code.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client(e) => Some(e),
            _ => None,
        }
    }

    /// Status code of the server response, when one was received and rejected.
    pub fn status_code(&self) -> Option<u16> {
        self.client_error().map(|e| e.status_code)
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Client(Box::new(e))
    }
}

/// An option passed while building a client was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("timeout must be greater than zero (actual timeout: {0})")]
    InvalidTimeout(i64),

    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid user agent '{0}'")]
    InvalidUserAgent(String),

    #[error("invalid value '{value}' for environment variable {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// The request could not be turned into an outbound HTTP message. The HTTP
/// dependency is never invoked when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid method: {0}")]
    Method(#[from] http::method::InvalidMethod),

    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),

    #[error("failed to serialize body: {0}")]
    Body(#[source] serde_json::Error),
}

/// The HTTP round-trip failed before a complete response was read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(BoxError),
}

impl TransportError {
    pub fn other(e: impl Into<BoxError>) -> Self {
        TransportError::Other(e.into())
    }
}

/// The server answered with a status code the resource operation does not
/// accept as success.
#[derive(Debug, thiserror::Error)]
#[error("{reason} (Status Code: {status_code} | Message: '{message}')")]
pub struct ClientError {
    pub reason: String,
    pub status_code: u16,
    pub message: String,
    pub response: Response,
}

impl ClientError {
    pub fn new(
        reason: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
        response: Response,
    ) -> Self {
        Self {
            reason: reason.into(),
            status_code,
            message: message.into(),
            response,
        }
    }
}
