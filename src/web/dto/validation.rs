//! Validation utilities for API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::auth::is_valid_national_id;
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Malformed JSON and failed validation both become a 400 with an
/// `{"error": ...}` body.
///
/// ```ignore
/// async fn signup(
///     ValidatedJson(payload): ValidatedJson<SignupRequest>,
/// ) -> Result<Json<SignupResponse>, ApiError> {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate a Spanish DNI or NIE, including its control letter.
pub fn national_id(value: &str) -> Result<(), validator::ValidationError> {
    if !is_valid_national_id(value) {
        return Err(validator::ValidationError::new("national_id")
            .with_message("Invalid DNI/NIE".into()));
    }
    Ok(())
}

/// Shortest full name accepted, counted after trimming.
pub const FULL_NAME_MIN_CHARS: usize = 3;

/// Validate a full name as it will be stored: trimmed, at least three characters.
pub fn full_name(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().chars().count() < FULL_NAME_MIN_CHARS {
        return Err(validator::ValidationError::new("full_name")
            .with_message("Full name must be at least 3 characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}
