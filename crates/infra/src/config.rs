//! Process configuration.
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. `AppConfig::default()`
//! 2. TOML file named by `CONFIG_PATH` (skipped when unset)
//! 3. Bare `JWT_SECRET` / `DATABASE_URL`
//! 4. `ESTATE_`-prefixed variables, nested with `__` (e.g. `ESTATE_SERVER__ADDR`)

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const ENV_PREFIX: &str = "ESTATE_";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The token signing secret is absent or empty. Fatal at startup.
    #[error("JWT_SECRET is not set in config or environment")]
    MissingSecret,

    #[error("failed to load configuration: {0}")]
    Load(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. In-memory stores are used when absent.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// `debug`, `info` or `prod` (errors only). Any other value is passed to
    /// the filter as-is.
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load from the process environment and the optional `CONFIG_PATH` file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::from_figment(Self::figment(path))
    }

    /// The layered provider chain, exposed so callers can add overrides.
    pub fn figment(config_path: Option<PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["JWT_SECRET"])
                    .map(|_| "auth.jwt_secret".into()),
            )
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "database.url".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// The token signing secret, or `MissingSecret` when absent or blank.
    pub fn signing_secret(&self) -> Result<&[u8], ConfigError> {
        match self.auth.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret.as_bytes()),
            _ => Err(ConfigError::MissingSecret),
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn extract(path: Option<PathBuf>) -> figment::Result<AppConfig> {
        AppConfig::figment(path).extract()
    }

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = extract(None)?;
            assert_eq!(config.server.addr, "0.0.0.0:8080");
            assert_eq!(config.server.request_timeout_secs, 4);
            assert_eq!(config.database.url, None);
            assert_eq!(config.logger.level, "info");
            assert_eq!(config.signing_secret(), Err(ConfigError::MissingSecret));
            Ok(())
        });
    }

    #[test]
    fn file_then_bare_env_then_prefixed_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "estate.toml",
                r#"
                [server]
                addr = "127.0.0.1:9000"

                [logger]
                level = "debug"

                [auth]
                jwt_secret = "from-file"
                "#,
            )?;
            jail.set_env("JWT_SECRET", "from-env");
            jail.set_env("DATABASE_URL", "postgres://localhost/estate");
            jail.set_env("ESTATE_SERVER__REQUEST_TIMEOUT_SECS", "10");
            jail.set_env("ESTATE_LOGGER__LEVEL", "prod");

            let config = extract(Some("estate.toml".into()))?;
            assert_eq!(config.server.addr, "127.0.0.1:9000");
            assert_eq!(config.server.request_timeout_secs, 10);
            assert_eq!(config.logger.level, "prod");
            assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/estate"));
            assert_eq!(config.signing_secret().ok(), Some("from-env".as_bytes()));
            Ok(())
        });
    }

    #[test]
    fn blank_secret_is_missing() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("JWT_SECRET", "   ");
            let config = extract(None)?;
            assert_eq!(config.signing_secret(), Err(ConfigError::MissingSecret));
            Ok(())
        });
    }

    #[test]
    fn malformed_value_is_a_load_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ESTATE_SERVER__REQUEST_TIMEOUT_SECS", "soon");
            let err = AppConfig::from_figment(AppConfig::figment(None)).unwrap_err();
            assert!(matches!(err, ConfigError::Load(_)));
            Ok(())
        });
    }
}
