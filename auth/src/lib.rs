//! Credential primitives for the account service.
//!
//! - Password hashing (Argon2id)
//! - Signed bearer tokens (HS256 JWT) and their one-way digests
//! - An `Authenticator` facade bundling both
//!
//! Nothing here touches storage: whether a token is still live is decided by
//! the caller against its persisted record.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issued = codec.issue(42, chrono::Duration::hours(24)).unwrap();
//! let claim = codec.parse(&issued.token).unwrap();
//! assert_eq!(claim.user_id, 42);
//! assert!(TokenCodec::matches_digest(&issued.token, &issued.token_hash));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod token;

pub use authenticator::Authenticator;
pub use jwt::Claim;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::MAX_PASSWORD_BYTES;
pub use token::IssuedToken;
pub use token::TokenCodec;
pub use token::TokenError;
