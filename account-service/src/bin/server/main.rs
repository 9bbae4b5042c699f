use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::auth::service::AuthService;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresCredentialStore;
use anyhow::Context;
use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().context("Failed to load configuration")?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        store_timeout_secs = config.database.timeout_secs,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .max_lifetime(config.database.max_lifetime())
        .acquire_timeout(config.database.timeout())
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tokio::time::timeout(
        config.database.timeout(),
        sqlx::query("SELECT 1").execute(&pg_pool),
    )
    .await
    .context("Database ping timed out")?
    .context("Database ping failed")?;
    tracing::info!(
        max_connections = config.database.max_connections,
        min_connections = config.database.min_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let authenticator = Arc::new(
        Authenticator::new(password_hasher.clone(), config.jwt.secret.as_bytes())
            .context("Invalid token signing secret")?,
    );

    let credential_store = Arc::new(PostgresCredentialStore::new(
        pg_pool,
        password_hasher,
        config.database.timeout(),
    ));

    let user_service = Arc::new(UserService::new(Arc::clone(&credential_store)));
    let token_ttl = config
        .jwt
        .token_ttl()
        .context("Invalid token lifetime")?;
    let auth_service = Arc::new(AuthService::new(
        credential_store,
        authenticator,
        token_ttl,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, auth_service);
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
