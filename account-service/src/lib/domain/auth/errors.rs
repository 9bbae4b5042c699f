use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::domain::credentials::errors::StoreError;

/// Why a login was refused. Logged, never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    InvalidEmail,
    UnknownEmail,
    WrongPassword,
}

/// Why a bearer token was refused. Logged, never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingHeader,
    MalformedHeader,
    InvalidSignature,
    MalformedToken,
    TokenNotFound,
    TokenHashMismatch,
    ClaimMismatch,
    TokenExpired,
    UserNotFound,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing authorization header",
            Self::MalformedHeader => "malformed authorization header",
            Self::InvalidSignature => "invalid token signature",
            Self::MalformedToken => "malformed token",
            Self::TokenNotFound => "no matching token",
            Self::TokenHashMismatch => "stored token hash mismatch",
            Self::ClaimMismatch => "token claim does not match stored owner",
            Self::TokenExpired => "token expired",
            Self::UserNotFound => "token owner not found",
        }
    }
}

/// Error for login and request authentication.
///
/// Both refusal variants display a fixed message regardless of the reason.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    AuthenticationFailed(LoginFailure),

    #[error("Unauthenticated")]
    Unauthenticated(UnauthenticatedReason),

    #[error("Password verification failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Token signing failed: {0}")]
    Signing(TokenError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusals_do_not_reveal_reason() {
        assert_eq!(
            AuthError::AuthenticationFailed(LoginFailure::UnknownEmail).to_string(),
            AuthError::AuthenticationFailed(LoginFailure::WrongPassword).to_string(),
        );
        assert_eq!(
            AuthError::Unauthenticated(UnauthenticatedReason::TokenExpired).to_string(),
            AuthError::Unauthenticated(UnauthenticatedReason::MissingHeader).to_string(),
        );
    }
}
