//! Router configuration for the HTTP API.

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    change_password, convert, create_account, deposit, health, index, list_accounts, login, me,
    refresh, signup, status, AppState,
};
use super::middleware::{login_rate_limit, require_auth};
use crate::rate_limit::RateLimiter;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, limiter: Arc<RateLimiter>) -> Router {
    // No authentication required
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/signup", post(signup))
        .route("/refresh", post(refresh))
        .route("/convert", get(convert));

    // Rate limited by client address, before any credential check
    let login_routes = Router::new()
        .route("/login", post(login))
        .route_layer(from_fn_with_state(limiter, login_rate_limit));

    // Bearer access token required
    let protected_routes = Router::new()
        .route("/status", get(status))
        .route("/user", get(me))
        .route("/change-password", post(change_password))
        .route("/create-account", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/deposit", post(deposit))
        .route_layer(from_fn_with_state(app_state.tokens(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(protected_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::currency::StaticRateProvider;
    use crate::Database;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn router() -> Router {
        let db = Database::open_in_memory().await.unwrap();
        let state = AppState::new(
            db,
            Arc::new(TokenIssuer::new("test-secret")),
            Arc::new(StaticRateProvider::new()),
        );
        create_router(Arc::new(state), Arc::new(RateLimiter::default()))
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = router().await;
        for (method, uri) in [
            ("GET", "/status"),
            ("GET", "/user"),
            ("GET", "/accounts"),
            ("POST", "/change-password"),
            ("POST", "/create-account"),
            ("POST", "/deposit"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_health_router() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = create_health_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
