use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;
use crate::jwt::Claim;
use crate::jwt::JwtHandler;

/// A freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Signed string handed to the caller
    pub token: String,
    /// SHA-256 of `token`
    pub token_hash: Vec<u8>,
    /// Same instant as `claim.exp`
    pub expires_at: DateTime<Utc>,
    pub claim: Claim,
}

/// Produces and parses signed, time-bounded user claims.
///
/// Independent of storage: `parse` verifies the signature only, and whether a
/// token is still live is decided against its persisted record.
pub struct TokenCodec {
    jwt_handler: JwtHandler,
}

impl TokenCodec {
    /// Create a codec signing with `secret`.
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            jwt_handler: JwtHandler::new(secret),
        })
    }

    /// Issue a token for `user_id` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `InvalidLifetime` - `now + ttl` is not representable
    /// * `Signing` - The signing primitive failed
    pub fn issue(&self, user_id: i64, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidLifetime)?;

        let claim = Claim::new(user_id, now, expires_at);
        let expires_at = claim.expires_at().ok_or(TokenError::InvalidLifetime)?;

        let token = self.jwt_handler.encode(&claim)?;
        let token_hash = Self::digest(&token);

        Ok(IssuedToken {
            token,
            token_hash,
            expires_at,
            claim,
        })
    }

    /// Verify a token's signature and decode its claim.
    ///
    /// Does not check expiry.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was tampered with or signed by another key
    /// * `Malformed` - Input is not a structurally valid token
    pub fn parse(&self, token: &str) -> Result<Claim, TokenError> {
        Ok(self.jwt_handler.decode::<Claim>(token)?)
    }

    /// One-way digest of a token string, as persisted alongside it.
    pub fn digest(token: &str) -> Vec<u8> {
        Sha256::digest(token.as_bytes()).to_vec()
    }

    /// Check that `digest` was derived from `token`.
    pub fn matches_digest(token: &str, digest: &[u8]) -> bool {
        Self::digest(token).as_slice() == digest
    }

    /// Short hex prefix of a digest, safe to log in place of the token.
    pub fn fingerprint(digest: &[u8]) -> String {
        hex::encode(&digest[..digest.len().min(6)])
    }
}
