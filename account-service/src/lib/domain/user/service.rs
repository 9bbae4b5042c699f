use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::credentials::ports::CredentialStore;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> UserService<S>
where
    S: CredentialStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> UserServicePort for UserService<S>
where
    S: CredentialStore,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let user = self.store.add_user(command).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        Ok(self.store.get_user_by_id(id).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.store.get_user_by_id(id).await?;

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_first_name) = command.first_name {
            user.first_name = new_first_name;
        }

        if let Some(new_last_name) = command.last_name {
            user.last_name = new_last_name;
        }

        let updated_user = self.store.update_user(user).await?;

        tracing::info!(user_id = %updated_user.id, "User updated");
        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.store.delete_user(id).await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn reset_password(&self, id: &UserId, new_password: Password) -> Result<(), UserError> {
        self.store.reset_password(id, &new_password).await?;

        tracing::info!(user_id = %id, "Password reset, token revoked");
        Ok(())
    }
}
