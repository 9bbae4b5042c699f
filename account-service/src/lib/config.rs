use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    /// Deadline for every individual store operation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Lifetime of issued tokens.
    ///
    /// # Errors
    /// Fails unless `expiration_hours` is positive and an expiry that far
    /// ahead is representable.
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_hours(self.expiration_hours)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "jwt.expiration_hours must be a positive number of hours, got {}",
                    self.expiration_hours
                ))
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        self.token_ttl()?;
        Ok(())
    }
}

// Keeps the secret out of the startup log.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    5
}

fn default_max_lifetime_secs() -> u64 {
    5 * 60
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_expiration_hours() -> i64 {
    24
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.jwt.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_defaults() {
        let config: DatabaseConfig =
            serde_json::from_value(serde_json::json!({ "url": "postgres://localhost/db" }))
                .unwrap();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.max_lifetime(), Duration::from_secs(300));
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let config = JwtConfig {
            secret: "super-secret-value".to_string(),
            expiration_hours: 24,
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }

    fn jwt(secret: &str, expiration_hours: i64) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours,
        }
    }

    #[test]
    fn test_token_ttl() {
        let ttl = jwt("secret", 24).token_ttl().unwrap();
        assert_eq!(ttl, chrono::Duration::hours(24));
    }

    #[test]
    fn test_token_ttl_rejects_non_positive_and_out_of_range() {
        assert!(jwt("secret", 0).token_ttl().is_err());
        assert!(jwt("secret", -1).token_ttl().is_err());
        assert!(jwt("secret", i64::MAX).token_ttl().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_jwt_settings() {
        assert!(jwt("secret", 24).validate().is_ok());
        assert!(jwt("   ", 24).validate().is_err());
        assert!(jwt("secret", 0).validate().is_err());
    }
}
