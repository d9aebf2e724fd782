//! User model for pinbank.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `pin_hash` and `updated_at` only change through PIN rotation.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    /// Server-generated UUID.
    pub id: String,
    /// Normalized national ID (unique).
    pub dni: String,
    /// Argon2 digest of the current PIN.
    pub pin_hash: String,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Signup timestamp.
    pub created_at: DateTime<Utc>,
    /// Last credential rotation (signup time until the first rotation).
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("dni", &crate::auth::NationalId::new(self.dni.as_str()).mask())
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Data for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub dni: String,
    pub pin_hash: String,
    pub full_name: String,
    pub email: String,
}

impl NewUser {
    /// Create a new user record.
    pub fn new(
        dni: impl Into<String>,
        pin_hash: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            dni: dni.into(),
            pin_hash: pin_hash.into(),
            full_name: full_name.into(),
            email: email.into(),
        }
    }
}
