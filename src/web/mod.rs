//! HTTP API for pinbank.
//!
//! axum router, handlers, DTOs and the middleware that gates protected
//! routes and rate limits login.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
