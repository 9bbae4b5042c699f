use async_trait::async_trait;
use mockall::mock;

use crate::domain::auth::models::NewToken;
use crate::domain::auth::models::Token;
use crate::domain::credentials::errors::StoreError;
use crate::domain::credentials::ports::CredentialStore;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

mock! {
    pub Store {}

    #[async_trait]
    impl CredentialStore for Store {
        async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, StoreError>;
        async fn get_user_by_id(&self, id: &UserId) -> Result<User, StoreError>;
        async fn list_users(&self) -> Result<Vec<User>, StoreError>;
        async fn add_user(&self, command: CreateUserCommand) -> Result<User, StoreError>;
        async fn update_user(&self, user: User) -> Result<User, StoreError>;
        async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;
        async fn reset_password(&self, id: &UserId, new_password: &Password) -> Result<(), StoreError>;
        async fn replace_token(&self, token: NewToken, user: &User) -> Result<Token, StoreError>;
        async fn get_token_by_plaintext(&self, token: &str) -> Result<Token, StoreError>;
        async fn get_user_for_token(&self, token: &Token) -> Result<User, StoreError>;
        async fn delete_token(&self, token: &str) -> Result<(), StoreError>;
    }
}
