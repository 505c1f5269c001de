use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::StorageType;

/// Environment variable read when `auth.jwt_secret` is not configured
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable read when `storage.database_url` is not configured
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token signing configuration
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; required at startup
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

/// User store backend selection
#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    /// `memory` or `postgres`
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Initial admin account created when the user store is empty
#[derive(Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default = "default_admin_person_id")]
    pub admin_person_id: String,
    /// Generated and logged once when absent
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_ttl_hours() -> u64 {
    24
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_admin_person_id() -> String {
    "ADMIN".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_person_id: default_admin_person_id(),
            admin_password: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "[hidden]"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_person_id", &self.admin_person_id)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[hidden]"),
            )
            .finish()
    }
}

impl AuthConfig {
    /// The configured signing secret, or a configuration error when unset
    pub fn jwt_secret(&self) -> Result<&str, DomainError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => Err(DomainError::configuration(format!(
                "JWT signing secret is not configured (set auth.jwt_secret or {})",
                JWT_SECRET_ENV
            ))),
        }
    }
}

impl StorageConfig {
    pub fn storage_type(&self) -> Result<StorageType, DomainError> {
        self.backend.parse()
    }

    /// The database URL, required for the postgres backend
    pub fn database_url(&self) -> Result<&str, DomainError> {
        match self.database_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(DomainError::configuration(format!(
                "PostgreSQL storage requires storage.database_url or {}",
                DATABASE_URL_ENV
            ))),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and `APP__*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    /// Fill unset secrets from their conventional environment variables
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if is_blank(self.auth.jwt_secret.as_deref()) {
            if let Some(secret) = lookup(JWT_SECRET_ENV).filter(|s| !s.is_empty()) {
                self.auth.jwt_secret = Some(secret);
            }
        }

        if is_blank(self.storage.database_url.as_deref()) {
            if let Some(url) = lookup(DATABASE_URL_ENV).filter(|s| !s.is_empty()) {
                self.storage.database_url = Some(url);
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(source: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.storage.storage_type().unwrap(), StorageType::InMemory);
        assert_eq!(config.bootstrap.admin_person_id, "ADMIN");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 9000

            [logging]
            format = "json"

            [auth]
            jwt_secret = "from-file"

            [storage]
            backend = "postgres"
            database_url = "postgres://localhost/auth"
            "#,
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.auth.jwt_secret().unwrap(), "from-file");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.storage.storage_type().unwrap(), StorageType::Postgres);
        assert_eq!(
            config.storage.database_url().unwrap(),
            "postgres://localhost/auth"
        );
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let config = AppConfig::default();
        assert!(matches!(
            config.auth.jwt_secret(),
            Err(DomainError::Configuration { .. })
        ));

        let blank = AuthConfig {
            jwt_secret: Some("   ".to_string()),
            token_ttl_hours: 24,
        };
        assert!(blank.jwt_secret().is_err());
    }

    #[test]
    fn test_env_fallbacks_fill_unset_values() {
        let mut config = AppConfig::default();
        config.apply_env_fallbacks(|key| match key {
            JWT_SECRET_ENV => Some("env-secret".to_string()),
            DATABASE_URL_ENV => Some("postgres://env/auth".to_string()),
            _ => None,
        });

        assert_eq!(config.auth.jwt_secret().unwrap(), "env-secret");
        assert_eq!(config.storage.database_url().unwrap(), "postgres://env/auth");
    }

    #[test]
    fn test_env_fallbacks_do_not_override_configured_values() {
        let mut config = from_toml(
            r#"
            [auth]
            jwt_secret = "from-file"
            "#,
        );
        config.apply_env_fallbacks(|_| Some("env-value".to_string()));

        assert_eq!(config.auth.jwt_secret().unwrap(), "from-file");
        assert_eq!(config.storage.database_url().unwrap(), "env-value");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("super-secret".to_string());
        config.storage.database_url = Some("postgres://user:pw@db/auth".to_string());
        config.bootstrap.admin_password = Some("admin-pass".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("user:pw"));
        assert!(!debug.contains("admin-pass"));
    }
}
