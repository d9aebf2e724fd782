//! Middleware for the HTTP API.

pub mod auth;
pub mod rate_limit;

pub use auth::{bearer_token, require_auth, AuthUser};
pub use rate_limit::{client_key, login_rate_limit};
