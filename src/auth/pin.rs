//! PIN generation, hashing and verification.
//!
//! PINs are hashed with Argon2id using the crate's default cost parameters.
//! Each digest is a PHC string carrying its own random salt and parameters.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use rand_core::OsRng;
use thiserror::Error;

/// Number of digits in a generated PIN.
pub const PIN_LENGTH: usize = 6;

/// PIN hashing errors.
#[derive(Error, Debug)]
pub enum PinError {
    /// Hashing failed.
    #[error("PIN hashing failed: {0}")]
    HashError(String),
}

impl From<PinError> for crate::BankError {
    fn from(e: PinError) -> Self {
        crate::BankError::Hashing(e.to_string())
    }
}

/// Generate a random numeric PIN of [`PIN_LENGTH`] digits.
///
/// Uses the thread-local CSPRNG; every digit is drawn uniformly from 0-9.
pub fn generate_pin() -> String {
    let mut rng = rand::rng();
    (0..PIN_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Hash a PIN.
///
/// Two calls with the same input produce different digests.
///
/// # Examples
///
/// ```
/// use pinbank::auth::pin::{hash_pin, verify_pin};
///
/// let digest = hash_pin("123456").unwrap();
/// assert!(digest.starts_with("$argon2id$"));
/// assert!(verify_pin("123456", &digest));
/// ```
pub fn hash_pin(pin: &str) -> Result<String, PinError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| PinError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a PIN against a stored digest.
///
/// Returns `false` for a wrong PIN and for a malformed digest alike.
/// The parameters are read from the digest itself.
pub fn verify_pin(pin: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok()
}

/// Generate a fresh PIN and its digest.
pub fn generate_pin_and_hash() -> Result<(String, String), PinError> {
    let pin = generate_pin();
    let digest = hash_pin(&pin)?;
    Ok((pin, digest))
}
