//! Error types for pinbank.

use thiserror::Error;

/// Common error type for pinbank.
#[derive(Error, Debug)]
pub enum BankError {
    /// Database error.
    ///
    /// Wraps any storage failure. Errors from sqlx are converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// National ID / PIN combination did not match a user.
    ///
    /// Used for both "no such user" and "wrong PIN" so callers cannot tell them apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Caller is not allowed to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but does not own the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Token failed signature, expiry or type checks.
    #[error("invalid token")]
    InvalidToken,

    /// Unique key already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("too many requests")]
    TooManyRequests,

    /// PIN hashing failure.
    #[error("hashing error: {0}")]
    Hashing(String),

    /// Token signing failure.
    #[error("token error: {0}")]
    Token(String),

    /// Exchange rate lookup failure.
    #[error("exchange rate error: {0}")]
    ExchangeRate(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BankError {
    fn from(e: sqlx::Error) -> Self {
        BankError::Database(e.to_string())
    }
}

/// Result type alias for pinbank operations.
pub type Result<T> = std::result::Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_display() {
        assert_eq!(BankError::InvalidCredentials.to_string(), "invalid credentials");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BankError::NotFound("user".to_string());
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = BankError::Conflict("national ID already registered".to_string());
        assert_eq!(
            err.to_string(),
            "conflict: national ID already registered"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BankError = io_err.into();
        assert!(matches!(err, BankError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: BankError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BankError::Database(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BankError::TooManyRequests)
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
