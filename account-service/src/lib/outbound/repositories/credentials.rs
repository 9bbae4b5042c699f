use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::auth::models::NewToken;
use crate::domain::auth::models::Token;
use crate::domain::credentials::errors::StoreError;
use crate::domain::credentials::ports::CredentialStore;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

const USER_COLUMNS: &str = "id, email, first_name, last_name, password, created_at, updated_at";
const TOKEN_COLUMNS: &str = "id, user_id, email, token, token_hash, expiry, created_at, updated_at";

/// Unique constraints that guard the email column.
const EMAIL_CONSTRAINTS: [&str; 2] = ["users_email_key", "users_email_lower_idx"];

/// PostgreSQL-backed credential store.
///
/// Passwords are hashed here, right before they are written.
pub struct PostgresCredentialStore {
    pool: PgPool,
    hasher: PasswordHasher,
    timeout: Duration,
}

impl PostgresCredentialStore {
    /// # Arguments
    /// * `pool` - Connection pool
    /// * `hasher` - Hasher applied to plaintext passwords before insert
    /// * `timeout` - Deadline for every store operation
    pub fn new(pool: PgPool, hasher: PasswordHasher, timeout: Duration) -> Self {
        Self {
            pool,
            hasher,
            timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(operation, timeout = ?self.timeout, "Store operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    timeout: self.timeout,
                })
            }
        }
    }

    /// Argon2 hashing on the blocking pool, off the request executor.
    async fn hash_password(&self, password: &Password) -> Result<String, StoreError> {
        let hasher = self.hasher.clone();
        let plaintext = password.expose().to_string();

        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("hashing task failed: {}", e)))??;
        Ok(password_hash)
    }

    fn row_to_user(row: &PgRow) -> Result<User, StoreError> {
        let id: i64 = row.try_get("id").map_err(database_error)?;
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            StoreError::CorruptRecord(format!("user {}: {}: {}", id, field, e))
        };

        Ok(User {
            id: UserId(id),
            email: EmailAddress::new(row.try_get("email").map_err(database_error)?)
                .map_err(|e| corrupt("email", &e))?,
            first_name: PersonName::new(row.try_get("first_name").map_err(database_error)?)
                .map_err(|e| corrupt("first_name", &e))?,
            last_name: PersonName::new(row.try_get("last_name").map_err(database_error)?)
                .map_err(|e| corrupt("last_name", &e))?,
            password_hash: row.try_get("password").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }

    fn row_to_token(row: &PgRow) -> Result<Token, StoreError> {
        Ok(Token {
            id: row.try_get("id").map_err(database_error)?,
            user_id: UserId(row.try_get("user_id").map_err(database_error)?),
            email: row.try_get("email").map_err(database_error)?,
            token: row.try_get("token").map_err(database_error)?,
            token_hash: row.try_get("token_hash").map_err(database_error)?,
            expiry: row.try_get("expiry").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        match row {
            Some(r) => Self::row_to_user(&r),
            None => Err(StoreError::NotFound(format!("user {}", id))),
        }
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn write_error(e: sqlx::Error, email: &EmailAddress) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation()
            && db_err
                .constraint()
                .is_some_and(|constraint| EMAIL_CONSTRAINTS.contains(&constraint))
        {
            return StoreError::EmailAlreadyExists(email.as_str().to_string());
        }
    }
    database_error(e)
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, StoreError> {
        self.bounded("get_user_by_email", async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM users WHERE lower(email) = lower($1)",
                USER_COLUMNS
            ))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

            match row {
                Some(r) => Self::row_to_user(&r),
                None => Err(StoreError::NotFound(format!("user {}", email))),
            }
        })
        .await
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<User, StoreError> {
        self.bounded("get_user_by_id", self.fetch_user(id)).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.bounded("list_users", async {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM users ORDER BY last_name, first_name, id",
                USER_COLUMNS
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

            rows.iter().map(Self::row_to_user).collect()
        })
        .await
    }

    async fn add_user(&self, command: CreateUserCommand) -> Result<User, StoreError> {
        let password_hash = self.hash_password(&command.password).await?;

        self.bounded("add_user", async {
            let row = sqlx::query(&format!(
                r#"
                INSERT INTO users (email, first_name, last_name, password)
                VALUES ($1, $2, $3, $4)
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(command.email.as_str())
            .bind(command.first_name.as_str())
            .bind(command.last_name.as_str())
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &command.email))?;

            Self::row_to_user(&row)
        })
        .await
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        self.bounded("update_user", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let row = sqlx::query(&format!(
                r#"
                UPDATE users
                SET email = $2, first_name = $3, last_name = $4, updated_at = NOW()
                WHERE id = $1
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(user.id.0)
            .bind(user.email.as_str())
            .bind(user.first_name.as_str())
            .bind(user.last_name.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| write_error(e, &user.email))?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user.id)))?;

            sqlx::query("UPDATE tokens SET email = $2, updated_at = NOW() WHERE user_id = $1")
                .bind(user.id.0)
                .bind(user.email.as_str())
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;

            tx.commit().await.map_err(database_error)?;

            Self::row_to_user(&row)
        })
        .await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        self.bounded("delete_user", async {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("user {}", id)));
            }
            Ok(())
        })
        .await
    }

    async fn reset_password(
        &self,
        id: &UserId,
        new_password: &Password,
    ) -> Result<(), StoreError> {
        let password_hash = self.hash_password(new_password).await?;

        self.bounded("reset_password", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let result =
                sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
                    .bind(id.0)
                    .bind(&password_hash)
                    .execute(&mut *tx)
                    .await
                    .map_err(database_error)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("user {}", id)));
            }

            sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;

            tx.commit().await.map_err(database_error)
        })
        .await
    }

    async fn replace_token(&self, token: NewToken, user: &User) -> Result<Token, StoreError> {
        self.bounded("replace_token", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            // Serializes concurrent logins of the same user.
            sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user.id.0)
                .fetch_optional(&mut *tx)
                .await
                .map_err(database_error)?
                .ok_or_else(|| StoreError::NotFound(format!("user {}", user.id)))?;

            sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(user.id.0)
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;

            let row = sqlx::query(&format!(
                r#"
                INSERT INTO tokens (user_id, email, token, token_hash, expiry)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {}
                "#,
                TOKEN_COLUMNS
            ))
            .bind(user.id.0)
            .bind(&token.email)
            .bind(&token.token)
            .bind(&token.token_hash)
            .bind(token.expiry)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error)?;

            tx.commit().await.map_err(database_error)?;

            Self::row_to_token(&row)
        })
        .await
    }

    async fn get_token_by_plaintext(&self, token: &str) -> Result<Token, StoreError> {
        self.bounded("get_token_by_plaintext", async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM tokens WHERE token = $1",
                TOKEN_COLUMNS
            ))
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

            match row {
                Some(r) => Self::row_to_token(&r),
                None => Err(StoreError::NotFound("token".to_string())),
            }
        })
        .await
    }

    async fn get_user_for_token(&self, token: &Token) -> Result<User, StoreError> {
        self.bounded("get_user_for_token", self.fetch_user(&token.user_id))
            .await
    }

    async fn delete_token(&self, token: &str) -> Result<(), StoreError> {
        self.bounded("delete_token", async {
            sqlx::query("DELETE FROM tokens WHERE token = $1")
                .bind(token)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(())
        })
        .await
    }
}
