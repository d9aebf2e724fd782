//! Configuration module for pinbank.

use serde::Deserialize;
use std::path::Path;

use crate::auth::token::MAX_TOKEN_TTL_SECS;
use crate::{BankError, Result};

/// Signing secret used when neither `config.toml` nor `JWT_SECRET` provides one.
///
/// Development only. Startup logs a warning whenever it is in effect.
pub const DEV_JWT_SECRET: &str = "my_secret_key";

/// Environment variable that overrides the JWT signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable that overrides the database path.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/pinbank.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token and credential configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_expiry() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_expiry_secs: default_access_expiry(),
            refresh_token_expiry_secs: default_refresh_expiry(),
        }
    }
}

/// Login rate limit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per client address in one window.
    #[serde(default = "default_login_max_requests")]
    pub login_max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// How often expired counters are swept, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_login_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            login_max_requests: default_login_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Exchange rate service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Base URL of the Frankfurter-compatible rate service.
    #[serde(default = "default_currency_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_currency_timeout")]
    pub timeout_secs: u64,
}

fn default_currency_base_url() -> String {
    "http://frankfurter:8080".to_string()
}

fn default_currency_timeout() -> u64 {
    10
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_url: default_currency_base_url(),
            timeout_secs: default_currency_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file; empty disables file output.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/pinbank.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Auth configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Rate limit configuration.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Exchange rate configuration.
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BankError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BankError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `JWT_SECRET`: signing secret for tokens
    /// - `DATABASE_PATH`: SQLite database file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(JWT_SECRET_ENV).filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = secret;
        }
        if let Some(path) = lookup(DATABASE_PATH_ENV).filter(|s| !s.is_empty()) {
            self.database.path = path;
        }
    }

    /// The secret tokens are signed with.
    ///
    /// Falls back to [`DEV_JWT_SECRET`] when nothing was configured.
    pub fn jwt_secret(&self) -> &str {
        if self.auth.jwt_secret.is_empty() {
            DEV_JWT_SECRET
        } else {
            &self.auth.jwt_secret
        }
    }

    /// Whether the insecure development secret is in effect.
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret.is_empty()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token_expiry_secs == 0 || self.auth.refresh_token_expiry_secs == 0 {
            return Err(BankError::Config(
                "token expiry must be greater than zero".to_string(),
            ));
        }
        if self.auth.access_token_expiry_secs > MAX_TOKEN_TTL_SECS
            || self.auth.refresh_token_expiry_secs > MAX_TOKEN_TTL_SECS
        {
            return Err(BankError::Config(format!(
                "token expiry must not exceed {MAX_TOKEN_TTL_SECS} seconds"
            )));
        }
        if self.rate_limit.login_max_requests == 0 || self.rate_limit.window_secs == 0 {
            return Err(BankError::Config(
                "rate limit requests and window must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.currency.base_url)
            .map_err(|e| BankError::Config(format!("invalid currency base_url: {e}")))?;
        Ok(())
    }
}
