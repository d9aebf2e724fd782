//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::currency::RateProvider;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::{BankError, Database, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Login rate limiter.
    limiter: Arc<RateLimiter>,
    /// How often the limiter drops expired counters.
    sweep_interval: Duration,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database, rates: Arc<dyn RateProvider>) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| BankError::Config(format!("invalid server address: {e}")))?;

        let tokens = Arc::new(TokenIssuer::with_expiry(
            config.jwt_secret(),
            config.auth.access_token_expiry_secs,
            config.auth.refresh_token_expiry_secs,
        ));
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(
            config.rate_limit.login_max_requests,
            config.rate_limit.window_secs,
        )));

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(db, tokens, rates)),
            limiter,
            sweep_interval: Duration::from_secs(config.rate_limit.sweep_interval_secs.max(1)),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> Router {
        create_router(self.app_state.clone(), self.limiter.clone()).merge(create_health_router())
    }

    async fn bind(&self) -> std::io::Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start the sweep only after a successful bind
        self.limiter.clone().start_sweep_task(self.sweep_interval);
        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Rate limit sweep task started"
        );

        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, _) = self.bind().await?;
        let router = self.router();

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// Useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, local_addr) = self.bind().await?;
        let router = self.router();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
