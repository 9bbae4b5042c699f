use std::fmt;

use auth::IssuedToken;
use auth::TokenCodec;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persisted bearer token.
///
/// `token_hash` is always the SHA-256 of `token`. A row is live until
/// `expiry`; expiry is checked when the token is presented, never swept.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub id: i64,
    pub user_id: UserId,
    pub email: String,
    pub token: String,
    pub token_hash: Vec<u8>,
    pub expiry: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }

    /// Loggable stand-in for the bearer string.
    pub fn fingerprint(&self) -> String {
        TokenCodec::fingerprint(&self.token_hash)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("fingerprint", &self.fingerprint())
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Token about to be inserted by `CredentialStore::replace_token`.
#[derive(Clone, PartialEq)]
pub struct NewToken {
    pub user_id: UserId,
    pub email: String,
    pub token: String,
    pub token_hash: Vec<u8>,
    pub expiry: DateTime<Utc>,
}

impl NewToken {
    pub fn for_user(user: &User, issued: IssuedToken) -> Self {
        Self {
            user_id: user.id,
            email: user.email.as_str().to_string(),
            token: issued.token,
            token_hash: issued.token_hash,
            expiry: issued.expires_at,
        }
    }
}

impl fmt::Debug for NewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewToken")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("fingerprint", &TokenCodec::fingerprint(&self.token_hash))
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Submitted login credentials, as received.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: Token,
    pub user: User,
}

/// Identity resolved from a request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    /// Bearer string the request presented, used to log out
    pub token: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token(expiry: DateTime<Utc>) -> Token {
        let now = Utc::now();
        Token {
            id: 1,
            user_id: UserId(1),
            email: "alice@example.com".to_string(),
            token: "plaintext-bearer".to_string(),
            token_hash: TokenCodec::digest("plaintext-bearer"),
            expiry,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(!token(now + Duration::seconds(1)).is_expired(now));
        assert!(token(now).is_expired(now));
        assert!(token(now - Duration::seconds(1)).is_expired(now));
    }

    #[test]
    fn test_debug_hides_bearer_string() {
        let rendered = format!("{:?}", token(Utc::now()));
        assert!(!rendered.contains("plaintext-bearer"));
        assert!(rendered.contains("fingerprint"));
    }

    #[test]
    fn test_login_command_debug_hides_password() {
        let command = LoginCommand {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(!format!("{:?}", command).contains("secret123"));
    }
}
