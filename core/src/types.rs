//! Account resource DTOs.
//!
//! # Design
//! These mirror the accounts service schema but are owned by this crate; the
//! mock server defines its own view of the same JSON and the integration
//! tests catch drift between the two. Every type derives `Default` so a
//! resource operation can hand a fresh value to the transport as a decode
//! target, and optional wire fields are skipped when unset.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account attributes as defined by the accounts service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
}

/// The `data` member of account payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AccountAttributes>,
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

/// Navigation links returned alongside a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Payload for creating an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRequest {
    pub data: AccountData,
}

/// An account as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountResponse {
    pub data: AccountData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Error body returned by the service on 4xx/5xx.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_field_is_renamed() {
        let data = AccountData {
            kind: Some("accounts".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "accounts");
        assert!(json.get("kind").is_none());
        assert!(json.get("attributes").is_none());
        assert!(json.get("version").is_none());
    }

    #[test]
    fn empty_attributes_serialize_to_empty_object() {
        let json = serde_json::to_value(AccountAttributes::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn response_accepts_unknown_and_missing_fields() {
        let body = r#"{
            "data": {
                "id": "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
                "organisation_id": "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
                "type": "accounts",
                "version": 0,
                "attributes": {"country": "GB", "name": ["Daniel"], "unknown": 1}
            },
            "links": {"self": "/v1/organisation/accounts/ad27e265-9605-4b4b-a0e5-3003ea9cc4dc"}
        }"#;
        let account: AccountResponse = serde_json::from_str(body).unwrap();
        assert_eq!(account.data.version, Some(0));
        let attributes = account.data.attributes.unwrap();
        assert_eq!(attributes.country.as_deref(), Some("GB"));
        assert_eq!(attributes.name, vec!["Daniel".to_string()]);
        assert!(attributes.iban.is_none());
        assert!(account.links.unwrap().self_link.is_some());
    }

    #[test]
    fn api_error_reads_message() {
        let err: ApiError = serde_json::from_str(r#"{"error_message":"record does not exist"}"#).unwrap();
        assert_eq!(err.error_message, "record does not exist");
    }
}
