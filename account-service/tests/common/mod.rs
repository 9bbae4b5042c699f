#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use account_service::domain::auth::service::AuthService;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresCredentialStore;
use auth::Authenticator;
use auth::PasswordHasher;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Cheap Argon2 cost so tests do not spend their time hashing.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(1024, 1, 1).expect("valid test cost")
}

/// Maintenance database used to create and drop per-test databases.
pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: TestDb,
    pub api_client: reqwest::Client,
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
}

impl TestApp {
    /// Spawn the application in a background task, or `None` when no
    /// database is configured.
    pub async fn spawn() -> Option<Self> {
        let db = TestDb::new().await?;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(db.store());
        let authenticator =
            Arc::new(Authenticator::new(test_hasher(), TEST_SECRET).expect("secret is set"));

        let user_service = Arc::new(UserService::new(Arc::clone(&store)));
        let auth_service = Arc::new(AuthService::new(
            store,
            authenticator,
            chrono::Duration::hours(24),
        ));

        let router = create_router(user_service, auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Some(Self {
            address,
            port,
            db,
            api_client: reqwest::Client::new(),
        })
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body's `data`.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/users")
            .json(&json!({
                "email": email,
                "first_name": "Alice",
                "last_name": "Liddell",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/users/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }
}

impl TestDb {
    /// Create a new test database with a unique name, or `None` when
    /// `DATABASE_URL` is not set.
    pub async fn new() -> Option<Self> {
        let Some(postgres_url) = database_url() else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        let db_name = format!(
            "test_account_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self { pool, db_name })
    }

    /// Credential store over this database.
    pub fn store(&self) -> PostgresCredentialStore {
        PostgresCredentialStore::new(self.pool.clone(), test_hasher(), STORE_TIMEOUT)
    }

    /// Number of token rows held for a user.
    pub async fn token_count(&self, user_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count tokens")
    }

    /// Move every token of a user into the past.
    pub async fn expire_tokens(&self, user_id: i64) {
        sqlx::query("UPDATE tokens SET expiry = NOW() - INTERVAL '1 minute' WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .expect("Failed to expire tokens");
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        tokio::spawn(async move {
            let Some(postgres_url) = database_url() else {
                return;
            };

            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
