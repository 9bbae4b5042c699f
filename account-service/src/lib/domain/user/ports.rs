use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, names and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Store` - Store failed or timed out
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Store` - Store failed or timed out
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve all users ordered by last name, then first name.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `command` - Command with optional email and name fields
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `Store` - Store failed or timed out
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete existing user and its token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Store` - Store failed or timed out
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Replace a user's password; the user's token is revoked.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Store` - Store failed, timed out or could not hash
    async fn reset_password(&self, id: &UserId, new_password: Password) -> Result<(), UserError>;
}
