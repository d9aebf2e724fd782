//! Credential store abstraction used by the auth service.

use std::future::Future;

use crate::db::{NewUser, User, UserRepository};
use crate::{Database, Result};

/// Persistence of user credentials.
///
/// `create_user` must be atomic with respect to concurrent signups for the
/// same national ID and fail with `BankError::Conflict` for duplicates.
pub trait CredentialStore: Send + Sync {
    /// Insert a user.
    fn create_user(&self, new_user: &NewUser) -> impl Future<Output = Result<User>> + Send;

    /// Look up a user by normalized national ID.
    fn find_by_national_id(&self, dni: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Look up a user by ID.
    fn find_by_id(&self, id: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Replace a user's PIN hash, bumping `updated_at`. False if the user is gone.
    fn update_pin_hash(&self, id: &str, pin_hash: &str)
        -> impl Future<Output = Result<bool>> + Send;
}

impl CredentialStore for Database {
    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        UserRepository::new(self.pool()).create(new_user).await
    }

    async fn find_by_national_id(&self, dni: &str) -> Result<Option<User>> {
        UserRepository::new(self.pool()).get_by_dni(dni).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        UserRepository::new(self.pool()).get_by_id(id).await
    }

    async fn update_pin_hash(&self, id: &str, pin_hash: &str) -> Result<bool> {
        UserRepository::new(self.pool())
            .update_pin_hash(id, pin_hash)
            .await
    }
}
