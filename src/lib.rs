//! pinbank - PIN-based banking backend
//!
//! Signup issues a server-generated PIN; login exchanges it for signed
//! access and refresh tokens. Accounts, deposits and currency conversion
//! sit behind bearer authentication.

pub mod auth;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod web;

pub use auth::{AuthService, CredentialStore, TokenIssuer, TokenKind, TokenPair};
pub use config::Config;
pub use currency::{FrankfurterClient, RateProvider, StaticRateProvider};
pub use db::{Account, Database, NewUser, Transaction, User};
pub use error::{BankError, Result};
pub use rate_limit::{RateLimitConfig, RateLimitResult, RateLimiter};
pub use web::WebServer;
