//! API handlers.

pub mod account;
pub mod auth;
pub mod currency;
pub mod general;
pub mod transaction;

pub use account::{create_account, list_accounts};
pub use auth::{change_password, login, me, refresh, signup, status, AppState};
pub use currency::convert;
pub use general::{health, index};
pub use transaction::deposit;
