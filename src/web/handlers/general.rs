//! Unauthenticated informational endpoints.

/// GET / - Greeting.
pub async fn index() -> &'static str {
    "Welcome to the Banking System!"
}

/// GET /health - Liveness check.
pub async fn health() -> &'static str {
    "OK"
}
