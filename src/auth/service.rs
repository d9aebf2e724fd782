//! Signup, login, token refresh and PIN rotation.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use super::national_id::NationalId;
use super::pin::{generate_pin_and_hash, hash_pin, verify_pin};
use super::store::CredentialStore;
use super::token::{TokenIssuer, TokenKind, TokenPair};
use crate::db::{NewUser, User};
use crate::{BankError, Result};

/// Result of a successful signup.
///
/// `pin` is the only time the plaintext PIN leaves the server.
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub user_id: String,
    pub pin: String,
}

/// Input for [`AuthService::signup`].
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub national_id: String,
    pub full_name: String,
    pub email: String,
}

/// Digest verified against when the national ID is unknown, so a login for
/// a missing user costs the same as one with a wrong PIN.
fn decoy_digest() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_pin("000000").ok())
        .as_deref()
}

/// Orchestrates credential flows over a [`CredentialStore`] and a [`TokenIssuer`].
pub struct AuthService<S> {
    store: S,
    tokens: Arc<TokenIssuer>,
}

impl<S: CredentialStore> AuthService<S> {
    /// Create a new auth service.
    pub fn new(store: S, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// The token issuer this service signs with.
    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Register a user and mint their first PIN.
    ///
    /// Fails with `Conflict` if the national ID is already registered.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome> {
        let national_id = NationalId::new(request.national_id).normalize();
        national_id
            .validate()
            .map_err(|e| BankError::Validation(e.to_string()))?;

        let (pin, pin_hash) = generate_pin_and_hash()?;
        let new_user = NewUser::new(
            national_id.as_str(),
            pin_hash,
            request.full_name.trim(),
            request.email.trim(),
        );

        let user = self.store.create_user(&new_user).await.map_err(|e| {
            if matches!(e, BankError::Conflict(_)) {
                info!(dni = %national_id, "Signup rejected: national ID already registered");
            }
            e
        })?;

        info!(user_id = %user.id, dni = %national_id, "User signed up");
        Ok(SignupOutcome {
            user_id: user.id,
            pin,
        })
    }

    /// Exchange a national ID and PIN for a token pair.
    ///
    /// Unknown ID and wrong PIN both yield `InvalidCredentials`.
    pub async fn login(&self, national_id: &str, pin: &str) -> Result<TokenPair> {
        let national_id = NationalId::new(national_id).normalize();
        let user = self.store.find_by_national_id(national_id.as_str()).await?;

        let Some(user) = user else {
            if let Some(decoy) = decoy_digest() {
                let _ = verify_pin(pin, decoy);
            }
            debug!(dni = %national_id, "Login failed: unknown national ID");
            return Err(BankError::InvalidCredentials);
        };

        if !verify_pin(pin, &user.pin_hash) {
            warn!(user_id = %user.id, "Login failed: wrong PIN");
            return Err(BankError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(&user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    /// Mint a new token pair from a valid refresh token.
    ///
    /// The presented refresh token stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self
            .tokens
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Refresh token rejected");
                BankError::from(e)
            })?;

        let pair = self.tokens.issue_pair(&claims.user_id)?;
        debug!(user_id = %claims.user_id, "Token pair refreshed");
        Ok(pair)
    }

    /// Rotate an authenticated user's PIN.
    ///
    /// The old PIN must verify. The server always generates the replacement
    /// and returns it in plaintext exactly once.
    pub async fn change_pin(&self, user_id: &str, old_pin: &str) -> Result<String> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| BankError::NotFound("user".to_string()))?;

        if !verify_pin(old_pin, &user.pin_hash) {
            warn!(user_id = %user.id, "PIN change rejected: old PIN mismatch");
            return Err(BankError::Unauthorized("invalid PIN".to_string()));
        }

        let (new_pin, new_hash) = generate_pin_and_hash()?;
        if !self.store.update_pin_hash(&user.id, &new_hash).await? {
            return Err(BankError::NotFound("user".to_string()));
        }

        info!(user_id = %user.id, "PIN rotated");
        Ok(new_pin)
    }

    /// Fetch the profile of an authenticated user.
    pub async fn profile(&self, user_id: &str) -> Result<User> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| BankError::NotFound("user".to_string()))
    }
}
