use std::time::Duration;

use auth::PasswordError;
use thiserror::Error;

/// Error for credential store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Store operation `{operation}` timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Stored record is invalid: {0}")]
    CorruptRecord(String),
}
