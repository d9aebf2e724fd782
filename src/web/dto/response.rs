//! Response DTOs for the HTTP API.

use serde::Serialize;

use crate::auth::{SignupOutcome, TokenPair};
use crate::db::{Account, User};

/// Signup response. Carries the only copy of the plaintext PIN.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user_id: String,
    pub pin: String,
}

impl From<SignupOutcome> for SignupResponse {
    fn from(outcome: SignupOutcome) -> Self {
        Self {
            user_id: outcome.user_id,
            pin: outcome.pin,
        }
    }
}

/// Login and refresh response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token (JWT).
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// PIN change response.
#[derive(Debug, Serialize)]
pub struct ChangePinResponse {
    pub message: String,
    pub new_pin: String,
}

/// Session status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Profile of the authenticated user.
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub dni: String,
    pub full_name: String,
    pub email: String,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            dni: user.dni,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

/// Account creation response.
#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub account_id: String,
    pub account_number: String,
}

impl From<&Account> for CreateAccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.clone(),
            account_number: account.account_number.clone(),
        }
    }
}
