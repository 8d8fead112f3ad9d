//! Accounts resource client.
//!
//! Each operation accepts exactly one status code as success; anything else
//! becomes an `Error::Client` carrying the server's `error_message`.

use std::sync::Arc;

use http::Method;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{ClientError, Error};
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::transport::Transport;
use crate::types::{AccountRequest, AccountResponse, ApiError};

const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

const UNEXPECTED_STATUS: &str = "Status code does not represent success for this request";

#[derive(Clone)]
pub struct Accounts {
    transport: Arc<dyn Transport>,
}

impl Accounts {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /v1/organisation/accounts/{id}`, expecting 200.
    pub async fn fetch(&self, id: Uuid, ctx: &CancellationToken) -> Result<AccountResponse, Error> {
        let mut account = AccountResponse::default();
        let mut api_error = ApiError::default();

        let request = RequestBuilder::new(Method::GET.as_str())
            .path(ACCOUNTS_PATH)
            .path(id.to_string())
            .context(ctx.clone())
            .result_into(&mut account)
            .error_into(&mut api_error)
            .build();

        let response = self.transport.send(request).await?;
        expect_status(response, 200, api_error)?;
        Ok(account)
    }

    /// `POST /v1/organisation/accounts`, expecting 201.
    pub async fn create(
        &self,
        account: &AccountRequest,
        ctx: &CancellationToken,
    ) -> Result<AccountResponse, Error> {
        let mut created = AccountResponse::default();
        let mut api_error = ApiError::default();

        let request = RequestBuilder::new(Method::POST.as_str())
            .path(ACCOUNTS_PATH)
            .body(account)
            .context(ctx.clone())
            .result_into(&mut created)
            .error_into(&mut api_error)
            .build();

        let response = self.transport.send(request).await?;
        expect_status(response, 201, api_error)?;
        Ok(created)
    }

    /// `DELETE /v1/organisation/accounts/{id}?version={version}`, expecting 204.
    pub async fn delete(&self, id: Uuid, version: i64, ctx: &CancellationToken) -> Result<(), Error> {
        let mut api_error = ApiError::default();

        let request = RequestBuilder::new(Method::DELETE.as_str())
            .path(ACCOUNTS_PATH)
            .path(id.to_string())
            .query_param("version", version.to_string())
            .context(ctx.clone())
            .error_into(&mut api_error)
            .build();

        let response = self.transport.send(request).await?;
        expect_status(response, 204, api_error)
    }
}

impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accounts").finish_non_exhaustive()
    }
}

fn expect_status(response: Response, expected: u16, api_error: ApiError) -> Result<(), Error> {
    if response.status_code() == expected {
        return Ok(());
    }
    let status = response.status_code();
    Err(ClientError::new(UNEXPECTED_STATUS, status, api_error.error_message, response).into())
}
