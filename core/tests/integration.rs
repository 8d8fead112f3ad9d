//! Account lifecycle against the live mock server.
//!
//! Starts the mock server on a random port and drives every accounts
//! operation through the default `reqwest`-backed client, so URL resolution,
//! headers, deadlines and body decoding are exercised over real HTTP.

use account_api::{
    AccountAttributes, AccountData, AccountRequest, CancellationToken, Client, Error,
};
use uuid::Uuid;

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/")
}

fn test_account() -> AccountRequest {
    AccountRequest {
        data: AccountData {
            attributes: Some(AccountAttributes {
                account_classification: Some("Personal".to_string()),
                account_matching_opt_out: Some(false),
                account_number: Some("41426815".to_string()),
                alternative_names: vec!["Daniel".to_string()],
                bank_id: Some("400300".to_string()),
                bank_id_code: Some("GBDSC".to_string()),
                base_currency: Some("GBP".to_string()),
                bic: Some("NWBKGB22".to_string()),
                country: Some("GB".to_string()),
                iban: Some("GB11NWBK40030041426819".to_string()),
                joint_account: Some(false),
                name: vec!["Daniel".to_string()],
                secondary_identification: Some("A1B2C3D4".to_string()),
                status: Some("confirmed".to_string()),
                switched: Some(false),
            }),
            id: Uuid::new_v4(),
            organisation_id: "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c".parse().unwrap(),
            kind: Some("accounts".to_string()),
            ..Default::default()
        },
    }
}

async fn client() -> Client {
    Client::builder()
        .base_url(&start_server().await)
        .timeout_ms(1000)
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn account_lifecycle() {
    let client = client().await;
    let accounts = client.accounts();
    let ctx = CancellationToken::new();
    let input = test_account();
    let id = input.data.id;

    // Create.
    let created = accounts.create(&input, &ctx).await.unwrap();
    assert_eq!(created.data.id, id);
    assert_eq!(created.data.version, Some(0));
    assert_eq!(created.data.attributes, input.data.attributes);

    // Fetch returns the same account.
    let fetched = accounts.fetch(id, &ctx).await.unwrap();
    assert_eq!(fetched, created);

    // Duplicate create is rejected.
    let err = accounts.create(&input, &ctx).await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));

    // Delete with a stale version is rejected.
    let err = accounts.delete(id, 5, &ctx).await.unwrap_err();
    let client_error = err.client_error().unwrap();
    assert_eq!(client_error.status_code, 409);
    assert_eq!(client_error.message, "invalid version");

    // Delete.
    accounts.delete(id, 0, &ctx).await.unwrap();

    // Fetch after delete is a 404 with the server's message.
    let err = accounts.fetch(id, &ctx).await.unwrap_err();
    let client_error = err.client_error().unwrap();
    assert_eq!(client_error.status_code, 404);
    assert_eq!(client_error.message, format!("record {id} does not exist"));

    // Delete again is a 404 with an empty body.
    let err = accounts.delete(id, 0, &ctx).await.unwrap_err();
    let client_error = err.client_error().unwrap();
    assert_eq!(client_error.status_code, 404);
    assert!(client_error.response.body().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_account_is_rejected() {
    let client = client().await;

    let err = client
        .accounts()
        .create(&AccountRequest::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    let client_error = err.client_error().unwrap();
    assert_eq!(client_error.status_code, 400);
    assert_eq!(client_error.message, "validation failure");
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::builder()
        .base_url(&format!("http://{addr}/"))
        .build()
        .unwrap();

    let err = client
        .accounts()
        .fetch(Uuid::new_v4(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}
