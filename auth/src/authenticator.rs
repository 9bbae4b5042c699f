use chrono::Duration;

use crate::jwt::Claim;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::IssuedToken;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Credential toolkit combining password hashing and token signing.
///
/// Holds the process-wide signing secret; read-only once constructed and
/// shared between requests behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher used for password checks
    /// * `secret` - Secret key for token signing
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn new(password_hasher: PasswordHasher, secret: &[u8]) -> Result<Self, TokenError> {
        Ok(Self {
            password_hasher,
            token_codec: TokenCodec::new(secret)?,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against its stored hash; a mismatch is `Ok(false)`.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue a signed token for a user.
    pub fn issue_token(&self, user_id: i64, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.token_codec.issue(user_id, ttl)
    }

    /// Verify a token's signature and decode its claim.
    pub fn parse_token(&self, token: &str) -> Result<Claim, TokenError> {
        self.token_codec.parse(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
        Authenticator::new(hasher, b"test_secret_key_at_least_32_bytes!").unwrap()
    }

    #[test]
    fn test_password_round_trip() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        assert!(authenticator.verify_password("my_password", &hash).unwrap());
        assert!(!authenticator.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_issue_and_parse_token() {
        let authenticator = authenticator();

        let issued = authenticator
            .issue_token(5, Duration::hours(1))
            .expect("Failed to issue token");
        let claim = authenticator
            .parse_token(&issued.token)
            .expect("Failed to parse token");

        assert_eq!(claim.user_id, 5);
    }

    #[test]
    fn test_rejects_empty_secret() {
        let result = Authenticator::new(PasswordHasher::new(), b"");
        assert!(matches!(result, Err(TokenError::MissingSecret)));
    }
}
