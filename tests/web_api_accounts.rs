//! Web API Account Tests
//!
//! Integration tests for account creation, deposits and conversion.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

use common::{create_account, create_test_server, signup_and_login, JANE_DNI, OTHER_DNI};
use pinbank::db::TransactionRepository;

#[tokio::test]
async fn test_create_account_defaults() {
    let app = create_test_server().await;
    let (user_id, _, access) = signup_and_login(&app.server, JANE_DNI).await;

    let response = app
        .server
        .post("/create-account")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert!(!body["account_id"].as_str().unwrap().is_empty());
    let number = body["account_number"].as_str().unwrap();
    assert_eq!(number.len(), 10);
    assert!(number.chars().all(|c| c.is_ascii_digit()));

    let response = app
        .server
        .get("/accounts")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .await;
    response.assert_status_ok();

    let accounts: Value = response.json();
    let accounts = accounts.as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["user_id"], user_id.as_str());
    assert_eq!(accounts[0]["currency"], "USD");
    assert_eq!(accounts[0]["account_type"], "checking");
    assert_eq!(accounts[0]["balance"], 0.0);
}

#[tokio::test]
async fn test_create_account_currency_uppercased() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;

    let response = app
        .server
        .post("/create-account")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "currency": "eur", "account_type": "Savings" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/accounts")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .await;
    let accounts: Value = response.json();
    assert_eq!(accounts[0]["currency"], "EUR");
    assert_eq!(accounts[0]["account_type"], "savings");
}

#[tokio::test]
async fn test_create_account_invalid_currency() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;

    for currency in ["EURO", "U1D", "US"] {
        let response = app
            .server
            .post("/create-account")
            .add_header(AUTHORIZATION, format!("Bearer {}", access))
            .json(&json!({ "currency": currency }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_accounts_empty_and_isolated() {
    let app = create_test_server().await;
    let (_, _, jane) = signup_and_login(&app.server, JANE_DNI).await;
    let (_, _, other) = signup_and_login(&app.server, OTHER_DNI).await;

    create_account(&app.server, &jane, "USD").await;

    let response = app
        .server
        .get("/accounts")
        .add_header(AUTHORIZATION, format!("Bearer {}", other))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_deposit_same_currency() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;
    let number = create_account(&app.server, &access, "USD").await;

    let response = app
        .server
        .post("/deposit")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "account_number": number, "amount": 100.0 }))
        .await;
    response.assert_status_ok();

    let record: Value = response.json();
    assert_eq!(record["transaction_type"], "deposit");
    assert_eq!(record["amount"], 100.0);
    assert_eq!(record["currency"], "USD");

    let response = app
        .server
        .get("/accounts")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .await;
    let accounts: Value = response.json();
    assert_eq!(accounts[0]["balance"], 100.0);
}

#[tokio::test]
async fn test_deposit_converts_currency() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;
    let number = create_account(&app.server, &access, "USD").await;

    let response = app
        .server
        .post("/deposit")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "account_number": number, "amount": 10.0, "currency": "eur" }))
        .await;
    response.assert_status_ok();

    let record: Value = response.json();
    assert_eq!(record["amount"], 12.5);
    assert_eq!(record["currency"], "EUR");

    let account_id = record["account_id"].as_str().unwrap();
    let history = TransactionRepository::new(app.db.pool())
        .list_by_account(account_id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 12.5);
}

#[tokio::test]
async fn test_deposit_unknown_rate_is_internal_error() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;
    let number = create_account(&app.server, &access, "USD").await;

    let response = app
        .server
        .post("/deposit")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "account_number": number, "amount": 10.0, "currency": "JPY" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "An internal error occurred" }));

    // Nothing was credited.
    let response = app
        .server
        .get("/accounts")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .await;
    let accounts: Value = response.json();
    assert_eq!(accounts[0]["balance"], 0.0);
}

#[tokio::test]
async fn test_deposit_invalid_amount() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;
    let number = create_account(&app.server, &access, "USD").await;

    for amount in [0.0, -5.0] {
        let response = app
            .server
            .post("/deposit")
            .add_header(AUTHORIZATION, format!("Bearer {}", access))
            .json(&json!({ "account_number": number, "amount": amount }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_deposit_unknown_account() {
    let app = create_test_server().await;
    let (_, _, access) = signup_and_login(&app.server, JANE_DNI).await;

    let response = app
        .server
        .post("/deposit")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "account_number": "0000000000", "amount": 5.0 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deposit_foreign_account_forbidden() {
    let app = create_test_server().await;
    let (_, _, jane) = signup_and_login(&app.server, JANE_DNI).await;
    let (_, _, other) = signup_and_login(&app.server, OTHER_DNI).await;
    let number = create_account(&app.server, &jane, "USD").await;

    let response = app
        .server
        .post("/deposit")
        .add_header(AUTHORIZATION, format!("Bearer {}", other))
        .json(&json!({ "account_number": number, "amount": 5.0 }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({ "error": "Account does not belong to the user" }));
}

#[tokio::test]
async fn test_convert() {
    let app = create_test_server().await;

    let response = app
        .server
        .get("/convert")
        .add_query_param("from", "EUR")
        .add_query_param("to", "USD")
        .add_query_param("amount", "10")
        .await;
    response.assert_status_ok();
    response.assert_text("10.00 EUR is 12.50 USD");
}

#[tokio::test]
async fn test_convert_bad_input() {
    let app = create_test_server().await;

    let response = app
        .server
        .get("/convert")
        .add_query_param("from", "EUR")
        .add_query_param("to", "USD")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get("/convert")
        .add_query_param("from", "EUR")
        .add_query_param("to", "USD")
        .add_query_param("amount", "ten")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_convert_unknown_rate() {
    let app = create_test_server().await;

    let response = app
        .server
        .get("/convert")
        .add_query_param("from", "JPY")
        .add_query_param("to", "USD")
        .add_query_param("amount", "10")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
