//! Currency conversion handler.

use std::sync::Arc;

use axum::extract::{Query, State};

use crate::currency::{convert as convert_amount, normalize_code};
use crate::web::dto::ConvertQuery;
use crate::web::error::ApiError;

/// GET /convert?from=EUR&to=USD&amount=10 - Convert an amount.
pub async fn convert(
    State(state): State<Arc<super::AppState>>,
    Query(query): Query<ConvertQuery>,
) -> Result<String, ApiError> {
    let (Some(from), Some(to), Some(amount)) = (query.from, query.to, query.amount) else {
        return Err(ApiError::bad_request(
            "Missing required parameters: from, to, amount",
        ));
    };

    let amount: f64 = amount
        .trim()
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite())
        .ok_or_else(|| ApiError::bad_request("Invalid amount"))?;
    let from = normalize_code(&from)?;
    let to = normalize_code(&to)?;

    let converted = convert_amount(state.rates.as_ref(), amount, &from, &to).await?;
    Ok(format!("{amount:.2} {from} is {converted:.2} {to}"))
}
