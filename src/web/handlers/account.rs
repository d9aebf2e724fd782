//! Account handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::currency::normalize_code;
use crate::db::{generate_account_number, Account, AccountRepository, NewAccount};
use crate::web::dto::{CreateAccountRequest, CreateAccountResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::BankError;

/// Account type used when the request leaves it out.
pub const DEFAULT_ACCOUNT_TYPE: &str = "checking";

/// Currency used when the request leaves it out.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Attempts at finding a free account number.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// POST /create-account - Open an account for the caller.
pub async fn create_account(
    State(state): State<Arc<super::AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), ApiError> {
    let currency = match req.currency.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => normalize_code(code)?,
        _ => DEFAULT_CURRENCY.to_string(),
    };
    let account_type = req
        .account_type
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_ACCOUNT_TYPE.to_string());

    let repo = AccountRepository::new(state.db.pool());
    let mut attempts = 0;
    let account = loop {
        attempts += 1;
        let new_account = NewAccount {
            user_id: user.user_id.clone(),
            account_number: generate_account_number(),
            currency: currency.clone(),
            account_type: account_type.clone(),
        };
        match repo.create(&new_account).await {
            Ok(account) => break account,
            Err(BankError::Conflict(_)) if attempts < ACCOUNT_NUMBER_ATTEMPTS => continue,
            Err(e) => return Err(e.into()),
        }
    };

    info!(
        user_id = %user.user_id,
        account_id = %account.id,
        currency = %account.currency,
        "Account created"
    );
    Ok((StatusCode::CREATED, Json((&account).into())))
}

/// GET /accounts - List the caller's accounts.
pub async fn list_accounts(
    State(state): State<Arc<super::AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = AccountRepository::new(state.db.pool())
        .list_by_user(&user.user_id)
        .await?;
    Ok(Json(accounts))
}
