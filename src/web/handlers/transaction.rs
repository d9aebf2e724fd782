//! Deposit handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::currency::{convert, normalize_code};
use crate::db::{AccountRepository, NewTransaction, Transaction};
use crate::web::dto::{DepositRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /deposit - Credit one of the caller's accounts.
///
/// Amounts in a foreign currency are converted into the account currency
/// before crediting. The stored record keeps the credited amount and the
/// currency the client deposited in.
pub async fn deposit(
    State(state): State<Arc<super::AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<DepositRequest>,
) -> Result<Json<Transaction>, ApiError> {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(ApiError::bad_request("Amount must be a positive number"));
    }

    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .get_by_number(req.account_number.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    if account.user_id != user.user_id {
        warn!(
            user_id = %user.user_id,
            account_id = %account.id,
            "Deposit into foreign account rejected"
        );
        return Err(ApiError::forbidden("Account does not belong to the user"));
    }

    let currency = match req.currency.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => normalize_code(code)?,
        _ => account.currency.clone(),
    };

    let credited = convert(state.rates.as_ref(), req.amount, &currency, &account.currency).await?;
    let record = repo
        .credit(&account.id, &NewTransaction::deposit(credited, &currency))
        .await?;

    info!(
        user_id = %user.user_id,
        account_id = %account.id,
        amount = req.amount,
        %currency,
        credited,
        "Deposit recorded"
    );
    Ok(Json(record))
}
