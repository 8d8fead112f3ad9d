//! In-memory fake of the organisation accounts service.
//!
//! Serves `/v1/organisation/accounts` with the status codes and error bodies
//! the real service uses, so the client can be exercised end to end without
//! network access.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// A stored account. `attributes` is kept verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: i64,
    pub attributes: Value,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: i64,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error_message": message.into() }))).into_response()
}

fn envelope(account: &Account) -> Value {
    json!({
        "data": account,
        "links": { "self": format!("{ACCOUNTS_PATH}/{}", account.id) },
    })
}

/// Pull a valid account out of a create payload.
///
/// Requires `data.id` and `data.organisation_id` as UUIDs, plus
/// `data.attributes.country` and a non-empty `data.attributes.name`.
pub fn validate(payload: &Value) -> Option<Account> {
    let data = payload.get("data")?;
    let id = data.get("id")?.as_str()?.parse().ok()?;
    let organisation_id = data.get("organisation_id")?.as_str()?.parse().ok()?;
    let attributes = data.get("attributes")?;
    attributes.get("country")?.as_str()?;
    if attributes.get("name")?.as_array()?.is_empty() {
        return None;
    }
    let kind = data
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("accounts")
        .to_string();
    Some(Account {
        id,
        organisation_id,
        kind,
        version: 0,
        attributes: attributes.clone(),
    })
}

async fn create_account(State(db): State<Db>, Json(payload): Json<Value>) -> Response {
    let Some(account) = validate(&payload) else {
        info!("rejected invalid account payload");
        return error_body(StatusCode::BAD_REQUEST, "validation failure");
    };
    let mut accounts = db.write().await;
    if accounts.contains_key(&account.id) {
        info!(id = %account.id, "duplicate account");
        return error_body(
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint",
        );
    }
    info!(id = %account.id, "created account");
    let body = envelope(&account);
    accounts.insert(account.id, account);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn fetch_account(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let accounts = db.read().await;
    info!(%id, found = accounts.contains_key(&id), "fetch account");
    match accounts.get(&id) {
        Some(account) => Json(envelope(account)).into_response(),
        None => error_body(StatusCode::NOT_FOUND, format!("record {id} does not exist")),
    }
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let mut accounts = db.write().await;
    let Some(account) = accounts.get(&id) else {
        info!(%id, "delete of unknown account");
        return StatusCode::NOT_FOUND.into_response();
    };
    if account.version != params.version {
        info!(%id, expected = account.version, got = params.version, "version mismatch");
        return error_body(StatusCode::CONFLICT, "invalid version");
    }
    accounts.remove(&id);
    info!(%id, "deleted account");
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Value {
        json!({
            "data": {
                "id": "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
                "organisation_id": "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
                "type": "accounts",
                "attributes": { "country": "GB", "name": ["Daniel"] }
            }
        })
    }

    #[test]
    fn account_serializes_type_field() {
        let account = validate(&payload()).unwrap();
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "accounts");
        assert_eq!(json["version"], 0);
        assert_eq!(json["attributes"]["country"], "GB");
    }

    #[test]
    fn validate_accepts_complete_payload() {
        let account = validate(&payload()).unwrap();
        assert_eq!(account.id.to_string(), "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc");
        assert_eq!(account.version, 0);
    }

    #[test]
    fn validate_rejects_empty_payload() {
        assert!(validate(&json!({})).is_none());
        assert!(validate(&json!({"data": {}})).is_none());
    }

    #[test]
    fn validate_rejects_missing_country() {
        let mut p = payload();
        p["data"]["attributes"]
            .as_object_mut()
            .unwrap()
            .remove("country");
        assert!(validate(&p).is_none());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut p = payload();
        p["data"]["attributes"]["name"] = json!([]);
        assert!(validate(&p).is_none());
    }

    #[test]
    fn validate_rejects_bad_id() {
        let mut p = payload();
        p["data"]["id"] = json!("not-a-uuid");
        assert!(validate(&p).is_none());
    }

    #[test]
    fn validate_defaults_type() {
        let mut p = payload();
        p["data"].as_object_mut().unwrap().remove("type");
        assert_eq!(validate(&p).unwrap().kind, "accounts");
    }
}
