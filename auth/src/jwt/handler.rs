use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Uses HS256 (HMAC with SHA-256).
///
/// Decoding checks the signature and the structure only: expiry and other
/// time-based claims are left to the caller, which compares them against the
/// persisted record. The signature is checked over the raw `header.payload`
/// text before either segment is decoded, so any altered byte reads as a bad
/// signature.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes for HS256)
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature of a JWT and decode its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match the signed text
    /// * `Malformed` - No signature segment, or a correctly signed token whose
    ///   header or claims cannot be decoded
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let (message, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| JwtError::Malformed("missing signature segment".to_string()))?;

        let verified = crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            self.algorithm,
        )
        .map_err(|e| JwtError::Malformed(e.to_string()))?;
        if !verified {
            return Err(JwtError::InvalidSignature);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}
