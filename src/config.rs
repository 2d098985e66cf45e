//! Configuration module for the survey intake service.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredUser;
use crate::error::{SurveyError, SurveyResult};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Bearer token and credential configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens.
    #[serde(default)]
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Access token lifetime in minutes.
    pub token_duration_minutes: i64,
    /// Fixed credential table.
    #[serde(default)]
    pub users: Vec<ConfiguredUser>,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. DATABASE_URL
    /// 2. Environment variables (SURVEY__*)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://survey.db?mode=rwc")?
            .set_default("auth.jwt_issuer", "survey-intake")?
            .set_default("auth.token_duration_minutes", 30)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SURVEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> SurveyResult<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(SurveyError::Config(
                "auth.jwt_secret must be set".to_string(),
            ));
        }
        if self.auth.token_duration_minutes <= 0 {
            return Err(SurveyError::Config(format!(
                "auth.token_duration_minutes must be positive, got {}",
                self.auth.token_duration_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                jwt_issuer: "survey-intake".to_string(),
                token_duration_minutes: 30,
                users: vec![],
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = sample();
        config.auth.jwt_secret = "  ".to_string();
        assert!(matches!(config.validate(), Err(SurveyError::Config(_))));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut config = sample();
        config.auth.token_duration_minutes = 0;
        assert!(matches!(config.validate(), Err(SurveyError::Config(_))));
    }

    #[test]
    fn test_users_deserialize_from_yaml() {
        let loaded: Config = ConfigLoader::builder()
            .add_source(File::from_str(
                r#"
server:
  host: 127.0.0.1
  port: 9000
database:
  url: "sqlite::memory:"
auth:
  jwt_secret: abc
  jwt_issuer: survey-intake
  token_duration_minutes: 15
  users:
    - username: admin
      password_hash: 8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918
"#,
                config::FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.auth.token_duration_minutes, 15);
        assert_eq!(loaded.auth.users.len(), 1);
        assert_eq!(loaded.auth.users[0].username, "admin");
    }
}
