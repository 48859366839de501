//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Backend selection between `SQLite` and PostgreSQL
//! - Configuration validation
//! - Redaction of the PostgreSQL connection string via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use student_records::config::{Backend, Config, DEFAULT_DATABASE_PATH};
//!
//! let config = Config {
//!     backend: Backend::Sqlite,
//!     database_path: DEFAULT_DATABASE_PATH.to_string(),
//!     database_url: None,
//!     log_level: "warn".to_string(),
//!     reset_database: false,
//! };
//! assert_eq!(config.backend.as_str(), "sqlite");
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, LOG_LEVELS};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default `SQLite` database file.
pub const DEFAULT_DATABASE_PATH: &str = "alumnos_cli.db";

/// Default log level. Kept quiet so log lines don't interleave with the menu.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Which relational store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Local `SQLite` file with free-text programs.
    #[default]
    Sqlite,
    /// PostgreSQL with courses and the operation log.
    Postgres,
}

impl Backend {
    /// Name used in configuration and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue {
                var: "STUDENT_STORE".into(),
                reason: format!("unknown backend '{other}' (expected sqlite or postgres)"),
            }),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Selected backend.
    pub backend: Backend,
    /// `SQLite` database file.
    pub database_path: String,
    /// PostgreSQL connection string.
    pub database_url: Option<SecretString>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Delete the `SQLite` file before opening it.
    pub reset_database: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `STUDENT_STORE`: `sqlite` or `postgres` (default: `sqlite`)
    /// - `DATABASE_PATH`: `SQLite` file (default: `alumnos_cli.db`)
    /// - `DATABASE_URL`: PostgreSQL connection string, required for `postgres`
    /// - `LOG_LEVEL`: Logging level (default: `warn`)
    /// - `RESET_DATABASE`: `true` to start from an empty `SQLite` file (default: `false`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be parsed or fails
    /// [`validate_config`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let backend = std::env::var("STUDENT_STORE")
            .map_or(Ok(Backend::default()), |val| val.parse::<Backend>())?;

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());

        let database_url = std::env::var("DATABASE_URL").ok().map(SecretString::new);

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let reset_database = parse_env_bool("RESET_DATABASE", false)?;

        let config = Self {
            backend,
            database_path,
            database_url,
            log_level,
            reset_database,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable as a boolean, using a default if not set.
fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: name.into(),
                reason: "must be true or false".into(),
            }),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to set up a clean test environment.
    fn setup_test_env() {
        env::remove_var("STUDENT_STORE");
        env::remove_var("DATABASE_PATH");
        env::remove_var("DATABASE_URL");
        env::remove_var("LOG_LEVEL");
        env::remove_var("RESET_DATABASE");
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        setup_test_env();

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.reset_database);
    }

    #[test]
    #[serial]
    fn test_config_from_env_postgres() {
        setup_test_env();

        env::set_var("STUDENT_STORE", "postgres");
        env::set_var("DATABASE_URL", "postgres://u:p@localhost/school");
        env::set_var("LOG_LEVEL", "debug");

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(
            config.database_url.as_ref().map(SecretString::expose),
            Some("postgres://u:p@localhost/school")
        );
        assert_eq!(config.log_level, "debug");
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_postgres_requires_url() {
        setup_test_env();
        env::set_var("STUDENT_STORE", "postgres");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { var } if var == "DATABASE_URL"
        ));
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_unknown_backend() {
        setup_test_env();
        env::set_var("STUDENT_STORE", "mysql");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "STUDENT_STORE"
        ));
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_reset_database_flag() {
        setup_test_env();
        env::set_var("RESET_DATABASE", "true");
        env::set_var("DATABASE_PATH", "/tmp/custom.db");

        let config = Config::from_env().expect("should load config");
        assert!(config.reset_database);
        assert_eq!(config.database_path, "/tmp/custom.db");
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_reset_flag() {
        setup_test_env();
        env::set_var("RESET_DATABASE", "maybe");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "RESET_DATABASE"
        ));
        setup_test_env();
    }

    #[test]
    fn test_config_debug_redacts_url() {
        let config = Config {
            backend: Backend::Postgres,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            database_url: Some(SecretString::new("postgres://u:topsecret@h/db")),
            log_level: "info".to_string(),
            reset_database: false,
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("<REDACTED>"));
        assert!(debug.contains("Postgres"));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("postgresql".parse::<Backend>().unwrap(), Backend::Postgres);
        assert!("oracle".parse::<Backend>().is_err());
    }

    #[test]
    #[serial]
    fn test_parse_env_bool_values() {
        env::set_var("TEST_BOOL", "YES");
        assert!(parse_env_bool("TEST_BOOL", false).unwrap());
        env::set_var("TEST_BOOL", "0");
        assert!(!parse_env_bool("TEST_BOOL", true).unwrap());
        env::remove_var("TEST_BOOL");
        assert!(parse_env_bool("TEST_BOOL", true).unwrap());
    }
}
