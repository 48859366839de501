//! Configuration validation.

use super::{Backend, Config};
use crate::error::ConfigError;

/// Accepted values for `LOG_LEVEL`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError`] if:
/// - `DATABASE_PATH` is empty for the `SQLite` backend
/// - `DATABASE_URL` is missing, empty or not a `postgres://` URL for the
///   PostgreSQL backend
/// - `LOG_LEVEL` is not one of [`LOG_LEVELS`]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    match config.backend {
        Backend::Sqlite => {
            if config.database_path.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "DATABASE_PATH".into(),
                    reason: "must not be empty".into(),
                });
            }
        }
        Backend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "DATABASE_URL".into(),
                })?;
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "DATABASE_URL".into(),
                    reason: "must not be empty".into(),
                });
            }
            let raw = url.expose();
            if !(raw.starts_with("postgres://") || raw.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidValue {
                    var: "DATABASE_URL".into(),
                    reason: "must start with postgres:// or postgresql://".into(),
                });
            }
        }
    }

    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        return Err(ConfigError::InvalidValue {
            var: "LOG_LEVEL".into(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    Ok(())
}
