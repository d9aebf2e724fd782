//! Authentication handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{AuthService, TokenIssuer};
use crate::currency::RateProvider;
use crate::web::dto::{
    ChangePinRequest, ChangePinResponse, LoginRequest, RefreshRequest, SignupRequest,
    SignupResponse, StatusResponse, TokenResponse, UserProfileResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::Database;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Credential flows.
    pub auth: AuthService<Database>,
    /// Exchange rate source.
    pub rates: Arc<dyn RateProvider>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, tokens: Arc<TokenIssuer>, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            auth: AuthService::new(db.clone(), tokens),
            db,
            rates,
        }
    }

    /// The token issuer used for signing and validation.
    pub fn tokens(&self) -> Arc<TokenIssuer> {
        self.auth.tokens().clone()
    }
}

/// POST /signup - Register a user and return their PIN.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let outcome = state
        .auth
        .signup(crate::auth::SignupRequest {
            national_id: req.dni,
            full_name: req.full_name,
            email: req.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// POST /login - Exchange DNI and PIN for tokens.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let pair = state.auth.login(&req.dni, &req.pin).await?;
    Ok(Json(pair.into()))
}

/// POST /refresh - Mint a new token pair from a refresh token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let pair = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// POST /change-password - Rotate the caller's PIN.
///
/// `new_pin` in the body is ignored; the server generates the replacement.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePinRequest>,
) -> Result<Json<ChangePinResponse>, ApiError> {
    if req.new_pin.is_some() {
        tracing::debug!(user_id = %user.user_id, "Ignoring client-supplied new PIN");
    }

    let new_pin = state.auth.change_pin(&user.user_id, &req.old_pin).await?;
    Ok(Json(ChangePinResponse {
        message: "PIN updated successfully".to_string(),
        new_pin,
    }))
}

/// GET /status - Confirm the access token is valid.
pub async fn status(_user: AuthUser) -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// GET /user - Profile of the caller.
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = state.auth.profile(&user.user_id).await?;
    Ok(Json(profile.into()))
}
