use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordError;
use auth::TokenCodec;
use auth::TokenError;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::LoginFailure;
use crate::domain::auth::errors::UnauthenticatedReason;
use crate::domain::auth::models::AuthenticatedUser;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::NewToken;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::credentials::errors::StoreError;
use crate::domain::credentials::ports::CredentialStore;
use crate::domain::user::models::EmailAddress;

const BEARER_SCHEME: &str = "Bearer";

/// Login and request authentication over a credential store.
///
/// Every step either advances or returns a typed error at once; nothing is
/// retried here. All refusals look the same to the caller and differ only in
/// the logged reason.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
    dummy_hash: OnceCell<Option<String>>,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence
    /// * `authenticator` - Password hasher and token signer
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            store,
            authenticator,
            token_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    fn reject_login(&self, reason: LoginFailure, email: &str) -> AuthError {
        tracing::warn!(email = %email, reason = ?reason, "Login rejected");
        AuthError::AuthenticationFailed(reason)
    }

    fn reject_request(&self, reason: UnauthenticatedReason) -> AuthError {
        tracing::warn!(reason = reason.as_str(), "Request authentication rejected");
        AuthError::Unauthenticated(reason)
    }

    /// Argon2 verification on the blocking pool, off the request executor.
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &hash))
            .await
            .map_err(|e| PasswordError::VerificationFailed(format!("hashing task failed: {}", e)))?
    }

    /// Spend the same hashing work as a real verification so that unknown
    /// emails cannot be told apart by response time.
    async fn burn_verification(&self, password: &str) {
        let dummy_hash = self
            .dummy_hash
            .get_or_init(|| async {
                let authenticator = Arc::clone(&self.authenticator);
                tokio::task::spawn_blocking(move || {
                    authenticator
                        .hash_password("timing-equalization-placeholder")
                        .ok()
                })
                .await
                .ok()
                .flatten()
            })
            .await;
        if let Some(hash) = dummy_hash {
            let _ = self.verify_password(password, hash).await;
        }
    }

    fn extract_bearer(authorization: Option<&str>) -> Result<&str, UnauthenticatedReason> {
        let header = authorization.ok_or(UnauthenticatedReason::MissingHeader)?;

        let parts: Vec<&str> = header.split(' ').collect();
        match parts.as_slice() {
            [scheme, token] if *scheme == BEARER_SCHEME && !token.is_empty() => Ok(token),
            _ => Err(UnauthenticatedReason::MalformedHeader),
        }
    }
}

#[async_trait]
impl<S> AuthServicePort for AuthService<S>
where
    S: CredentialStore,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let email = match EmailAddress::new(command.email.clone()) {
            Ok(email) => email,
            Err(_) => {
                self.burn_verification(&command.password).await;
                return Err(self.reject_login(LoginFailure::InvalidEmail, &command.email));
            }
        };

        let user = match self.store.get_user_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                self.burn_verification(&command.password).await;
                return Err(self.reject_login(LoginFailure::UnknownEmail, email.as_str()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to look up user for login");
                return Err(e.into());
            }
        };

        let matched = self
            .verify_password(&command.password, &user.password_hash)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Cannot verify stored password hash");
                AuthError::from(e)
            })?;
        if !matched {
            return Err(self.reject_login(LoginFailure::WrongPassword, email.as_str()));
        }

        let issued = self
            .authenticator
            .issue_token(user.id.0, self.token_ttl)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to sign token");
                AuthError::Signing(e)
            })?;

        let token = self
            .store
            .replace_token(NewToken::for_user(&user, issued), &user)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to persist token");
                AuthError::from(e)
            })?;

        tracing::info!(
            user_id = %user.id,
            token = %token.fingerprint(),
            expiry = %token.expiry,
            "User logged in"
        );

        Ok(LoginOutcome { token, user })
    }

    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let raw_token =
            Self::extract_bearer(authorization).map_err(|reason| self.reject_request(reason))?;

        let claim = self
            .authenticator
            .parse_token(raw_token)
            .map_err(|e| match e {
                TokenError::InvalidSignature => {
                    self.reject_request(UnauthenticatedReason::InvalidSignature)
                }
                _ => self.reject_request(UnauthenticatedReason::MalformedToken),
            })?;

        // Looked up by the signed string itself, not by the decoded claim.
        let token = match self.store.get_token_by_plaintext(raw_token).await {
            Ok(token) => token,
            Err(StoreError::NotFound(_)) => {
                return Err(self.reject_request(UnauthenticatedReason::TokenNotFound))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to look up token");
                return Err(e.into());
            }
        };

        if !TokenCodec::matches_digest(raw_token, &token.token_hash) {
            tracing::error!(
                token_id = token.id,
                user_id = %token.user_id,
                "Stored token hash does not match its token"
            );
            return Err(self.reject_request(UnauthenticatedReason::TokenHashMismatch));
        }

        if claim.user_id != token.user_id.0 {
            tracing::error!(
                token_id = token.id,
                claim_user_id = claim.user_id,
                user_id = %token.user_id,
                "Token claim names a different user than its row"
            );
            return Err(self.reject_request(UnauthenticatedReason::ClaimMismatch));
        }

        if token.is_expired(Utc::now()) {
            return Err(self.reject_request(UnauthenticatedReason::TokenExpired));
        }

        let user = match self.store.get_user_for_token(&token).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                tracing::error!(
                    token_id = token.id,
                    user_id = %token.user_id,
                    "Token references a missing user"
                );
                return Err(self.reject_request(UnauthenticatedReason::UserNotFound));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve token owner");
                return Err(e.into());
            }
        };

        tracing::debug!(user_id = %user.id, token = %token.fingerprint(), "Request authenticated");

        Ok(AuthenticatedUser {
            user,
            token: token.token,
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.store.delete_token(token).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to delete token");
            AuthError::from(e)
        })?;

        tracing::info!(
            token = %TokenCodec::fingerprint(&TokenCodec::digest(token)),
            "Token revoked"
        );
        Ok(())
    }
}
