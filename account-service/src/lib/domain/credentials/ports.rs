use async_trait::async_trait;

use crate::domain::auth::models::NewToken;
use crate::domain::auth::models::Token;
use crate::domain::credentials::errors::StoreError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persistence for user records and the tokens issued to them.
///
/// Implementations bound every call with a deadline and report
/// `StoreError::Timeout` when it passes. At most one token row exists per
/// user; `replace_token` is the only way to create one.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by email (case-insensitive).
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, StoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, StoreError>;

    /// Retrieve all users, ordered by last name then first name.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Hash the command's plaintext password and insert the user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password could not be hashed
    async fn add_user(&self, command: CreateUserCommand) -> Result<User, StoreError>;

    /// Persist profile fields of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    async fn update_user(&self, user: User) -> Result<User, StoreError>;

    /// Remove a user together with its token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;

    /// Hash and store a new password, revoking the user's token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Hashing` - Password could not be hashed
    async fn reset_password(&self, id: &UserId, new_password: &Password)
        -> Result<(), StoreError>;

    /// Atomically delete the user's token, if any, and insert `token`.
    ///
    /// # Returns
    /// The inserted token row
    async fn replace_token(&self, token: NewToken, user: &User) -> Result<Token, StoreError>;

    /// Retrieve the token row whose `token` column equals the bearer string.
    ///
    /// # Errors
    /// * `NotFound` - No such token
    async fn get_token_by_plaintext(&self, token: &str) -> Result<Token, StoreError>;

    /// Resolve the user owning `token`.
    ///
    /// # Errors
    /// * `NotFound` - The owner is gone (dangling foreign key)
    async fn get_user_for_token(&self, token: &Token) -> Result<User, StoreError>;

    /// Delete a token by its bearer string. Deleting an absent token succeeds.
    async fn delete_token(&self, token: &str) -> Result<(), StoreError>;
}
