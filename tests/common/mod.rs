//! Test helpers for HTTP API tests.
//!
//! Builds the real router over an in-memory database and a fixed rate table.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};

use pinbank::rate_limit::{RateLimitConfig, RateLimiter};
use pinbank::web::{create_health_router, create_router, AppState};
use pinbank::{Database, StaticRateProvider, TokenIssuer};

/// Signing secret used by test servers.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A valid DNI for the default test user.
pub const JANE_DNI: &str = "12345678Z";

/// A second valid DNI.
pub const OTHER_DNI: &str = "00000000T";

/// Test server plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub tokens: Arc<TokenIssuer>,
}

/// Rates used by test servers: 1 EUR = 1.25 USD, 1 GBP = 1.5 USD.
pub fn test_rates() -> StaticRateProvider {
    StaticRateProvider::new()
        .with_rate("EUR", "USD", 1.25)
        .with_rate("GBP", "USD", 1.5)
}

/// Create a test server with a generous login limit.
pub async fn create_test_server() -> TestApp {
    create_test_server_with_limit(1000).await
}

/// Create a test server allowing `login_limit` logins per minute per client.
pub async fn create_test_server_with_limit(login_limit: u32) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let tokens = Arc::new(TokenIssuer::new(TEST_SECRET));
    let state = Arc::new(AppState::new(
        db.clone(),
        tokens.clone(),
        Arc::new(test_rates()),
    ));
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(login_limit, 60)));

    let router = create_router(state, limiter).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db, tokens }
}

/// Sign up a user and return `(user_id, pin)`.
pub async fn signup(server: &TestServer, dni: &str) -> (String, String) {
    let response = server
        .post("/signup")
        .json(&json!({
            "fullName": "Jane Roe",
            "dni": dni,
            "email": "jane@x.com"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    (
        body["user_id"].as_str().unwrap().to_string(),
        body["pin"].as_str().unwrap().to_string(),
    )
}

/// Log in and return `(access_token, refresh_token)`.
pub async fn login(server: &TestServer, dni: &str, pin: &str) -> (String, String) {
    let response = server
        .post("/login")
        .json(&json!({ "dni": dni, "pin": pin }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Sign up and log in, returning `(user_id, pin, access_token)`.
pub async fn signup_and_login(server: &TestServer, dni: &str) -> (String, String, String) {
    let (user_id, pin) = signup(server, dni).await;
    let (access, _) = login(server, dni, &pin).await;
    (user_id, pin, access)
}

/// Open an account and return its number.
pub async fn create_account(server: &TestServer, access: &str, currency: &str) -> String {
    let response = server
        .post("/create-account")
        .add_header(AUTHORIZATION, format!("Bearer {}", access))
        .json(&json!({ "currency": currency }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["account_number"].as_str().unwrap().to_string()
}

/// A PIN guaranteed to differ from `pin`.
pub fn wrong_pin(pin: &str) -> &'static str {
    if pin == "000000" {
        "111111"
    } else {
        "000000"
    }
}
