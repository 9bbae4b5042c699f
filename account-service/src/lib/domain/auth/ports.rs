use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedUser;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;

/// Port for login, logout and per-request authentication.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue the user's single live token.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown email or wrong password (indistinguishable)
    /// * `Hashing` - Stored hash cannot be verified
    /// * `Signing` - Token could not be signed
    /// * `Store` - Store failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Resolve the user behind an `Authorization: Bearer <token>` header.
    ///
    /// # Arguments
    /// * `authorization` - Raw header value, `None` when absent
    ///
    /// # Errors
    /// * `Unauthenticated` - Any step of the check failed
    /// * `Store` - Store failed or timed out
    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// Revoke a token. Revoking an unknown token succeeds.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;
}
