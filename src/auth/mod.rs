//! Authentication module for pinbank.
//!
//! PIN hashing, national ID validation, signed tokens and the service that
//! ties them to the credential store.

pub mod national_id;
pub mod pin;
mod service;
mod store;
pub mod token;

pub use national_id::{is_valid_national_id, NationalId, NationalIdError};
pub use pin::{generate_pin, hash_pin, verify_pin, PinError, PIN_LENGTH};
pub use service::{AuthService, SignupOutcome, SignupRequest};
pub use store::CredentialStore;
pub use token::{Claims, TokenError, TokenIssuer, TokenKind, TokenPair};
