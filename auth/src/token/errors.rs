use thiserror::Error;

use crate::jwt::JwtError;

/// Error type for bearer token issuance and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token lifetime out of range")]
    InvalidLifetime,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(msg) => TokenError::Signing(msg),
            JwtError::InvalidSignature => TokenError::InvalidSignature,
            JwtError::Malformed(msg) => TokenError::Malformed(msg),
        }
    }
}
