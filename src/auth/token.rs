//! Signed access and refresh tokens.
//!
//! Tokens are HS256 JWTs signed with a single process-wide secret. Both kinds
//! carry the same claims shape plus a `token_type` discriminant, so an access
//! token is never accepted where a refresh token is expected and vice versa.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default access token lifetime.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Default refresh token lifetime.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest lifetime a token may be issued with (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Which purpose a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authenticates protected API calls.
    Access,
    /// Only mints new token pairs.
    Refresh,
}

/// Payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to.
    pub user_id: String,
    /// Token purpose.
    pub token_type: TokenKind,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

/// An access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token validation and signing failures.
///
/// The HTTP layer collapses every variant into one "invalid token" response.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Signature did not verify or the token is not a well-formed JWT.
    #[error("invalid token signature")]
    InvalidSignature,
    /// Token is past its expiry.
    #[error("token expired")]
    Expired,
    /// Token was issued for a different purpose.
    #[error("unexpected token type")]
    WrongKind,
    /// Signing failed.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<TokenError> for crate::BankError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(msg) => crate::BankError::Token(msg),
            _ => crate::BankError::InvalidToken,
        }
    }
}

fn ttl(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TOKEN_TTL_SECS) as i64)
}

/// Issues and validates signed tokens.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer with the default lifetimes (15 minutes / 7 days).
    pub fn new(secret: &str) -> Self {
        Self::with_expiry(secret, ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS)
    }

    /// Create an issuer with custom lifetimes in seconds.
    ///
    /// Lifetimes are capped at [`MAX_TOKEN_TTL_SECS`].
    pub fn with_expiry(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        // Expiry is checked against an explicit clock in `validate_at`.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: ttl(access_ttl_secs),
            refresh_ttl: ttl(refresh_ttl_secs),
        }
    }

    /// Issue an access token for a user.
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenKind::Access, Utc::now())
    }

    /// Issue a refresh token for a user.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenKind::Refresh, Utc::now())
    }

    /// Issue both tokens for a user.
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, TokenError> {
        self.issue_pair_at(user_id, Utc::now())
    }

    /// Issue both tokens as of `now`.
    pub fn issue_pair_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_at(user_id, TokenKind::Access, now)?,
            refresh_token: self.issue_at(user_id, TokenKind::Refresh, now)?,
        })
    }

    /// Issue a token of the given kind as of `now`.
    pub fn issue_at(
        &self,
        user_id: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            user_id: user_id.to_string(),
            token_type: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Validate a token of the expected kind against the current time.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        self.validate_at(token, expected, Utc::now())
    }

    /// Validate a token of the expected kind as of `now`.
    ///
    /// The token is valid while `now < exp`.
    pub fn validate_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignature,
            }
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.token_type != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(claims)
    }
}
