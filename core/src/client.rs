//! Top-level client and its configuration builder.
//!
//! # Design
//! Options are applied in order and validated as they arrive; the first
//! invalid one is remembered and returned by `build`, so no partially
//! configured client is ever produced. The resulting configuration is frozen
//! inside a shared `BaseClient`.

use std::sync::Arc;

use http::HeaderValue;
use url::Url;

use crate::accounts::Accounts;
use crate::error::{ConfigError, Error};
use crate::http::{HttpClient, ReqwestClient};
use crate::transport::BaseClient;

pub const DEFAULT_BASE_URL: &str = "https://api.form3.tech/";

pub const DEFAULT_USER_AGENT: &str = concat!("account-api/", env!("CARGO_PKG_VERSION"));

pub const ENV_BASE_URL: &str = "ACCOUNT_API_URL";
pub const ENV_USER_AGENT: &str = "ACCOUNT_API_USER_AGENT";
pub const ENV_TIMEOUT_MS: &str = "ACCOUNT_API_TIMEOUT_MS";

/// Entry point: holds the shared transport and the resource clients.
#[derive(Debug, Clone)]
pub struct Client {
    base: Arc<BaseClient>,
    accounts: Accounts,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// A client with every option at its default.
    pub fn new() -> Result<Self, Error> {
        ClientBuilder::new().build()
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn base_url(&self) -> &Url {
        self.base.base_url()
    }

    pub fn user_agent(&self) -> &str {
        self.base.user_agent()
    }

    /// Configured timeout; `0` when unset.
    pub fn timeout_ms(&self) -> u64 {
        self.base.timeout_ms()
    }
}

pub struct ClientBuilder {
    base_url: Option<Url>,
    user_agent: String,
    timeout_ms: u64,
    http_client: Option<Arc<dyn HttpClient>>,
    error: Option<ConfigError>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 0,
            http_client: None,
            error: None,
        }
    }

    /// Seed options from `ACCOUNT_API_URL`, `ACCOUNT_API_USER_AGENT` and
    /// `ACCOUNT_API_TIMEOUT_MS`. Unset variables leave the defaults alone.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut builder = Self::new();
        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(&url);
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            builder = builder.user_agent(agent);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            builder = match raw.trim().parse::<i64>() {
                Ok(ms) => builder.timeout_ms(ms),
                Err(_) => builder.fail(ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT_MS,
                    value: raw,
                }),
            };
        }
        builder
    }

    pub fn base_url(mut self, url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) => self.base_url = Some(parsed),
            Err(source) => {
                self = self.fail(ConfigError::InvalidBaseUrl {
                    url: url.to_string(),
                    source,
                })
            }
        }
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        if HeaderValue::from_str(&user_agent).is_err() {
            return self.fail(ConfigError::InvalidUserAgent(user_agent));
        }
        self.user_agent = user_agent;
        self
    }

    /// Must be greater than zero.
    pub fn timeout_ms(mut self, timeout_ms: i64) -> Self {
        if timeout_ms <= 0 {
            return self.fail(ConfigError::InvalidTimeout(timeout_ms));
        }
        self.timeout_ms = timeout_ms.unsigned_abs();
        self
    }

    /// Replace the default `reqwest`-backed HTTP dependency.
    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    fn fail(mut self, error: ConfigError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).map_err(|source| ConfigError::InvalidBaseUrl {
                url: DEFAULT_BASE_URL.to_string(),
                source,
            })?,
        };
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestClient::default()));

        let base = Arc::new(
            BaseClient::new(base_url, http_client)
                .with_user_agent(self.user_agent)
                .with_timeout_ms(self.timeout_ms),
        );
        let accounts = Accounts::new(base.clone());
        Ok(Client { base, accounts })
    }
}
