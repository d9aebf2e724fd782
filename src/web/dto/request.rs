//! Request DTOs for the HTTP API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{full_name, national_id, not_empty_trimmed};

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Full name, at least three characters once trimmed.
    #[serde(alias = "fullName")]
    #[validate(custom(function = "full_name"))]
    pub full_name: String,
    /// DNI or NIE.
    #[validate(custom(function = "national_id"))]
    pub dni: String,
    /// Contact email.
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// DNI or NIE.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub dni: String,
    /// Six digit PIN.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub pin: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub refresh_token: String,
}

/// PIN change request.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePinRequest {
    /// Current PIN.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub old_pin: String,
    /// Accepted for compatibility and ignored; the server picks the new PIN.
    #[serde(default)]
    pub new_pin: Option<String>,
}

/// Account creation request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Account type, `checking` when absent.
    #[serde(default)]
    pub account_type: Option<String>,
    /// ISO currency code, `USD` when absent.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Deposit request.
#[derive(Debug, Deserialize, Validate)]
pub struct DepositRequest {
    /// Target account number.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub account_number: String,
    /// Amount in `currency`.
    pub amount: f64,
    /// Currency of the amount; the account currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Query string of `GET /convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}
