//! Rate limiting middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::rate_limit::{RateLimitResult, RateLimiter};
use crate::web::error::ApiError;

/// Key used when the peer address is not available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Client key for a request: the peer IP from the connection.
///
/// Forwarding headers are ignored since clients can set them freely.
pub fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Rate limiting middleware for the login endpoint.
pub async fn login_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_key(&req);

    if let RateLimitResult::Denied { retry_after } = limiter.check(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return ApiError::too_many_requests(Some(retry_after)).into_response();
    }

    next.run(req).await
}
