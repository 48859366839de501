//! Error types for the student record manager.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`StorageError`]: Database operation errors
//! - [`ConfigError`]: Configuration errors
//! - [`InputError`]: Malformed console input
//!
//! All errors implement `Send + Sync`.

use thiserror::Error;

/// Top-level application error.
///
/// Only startup failures and terminal I/O failures reach this level; store
/// and input errors raised inside a menu handler are printed and swallowed.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage errors.
///
/// These errors represent failures in database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// Short name of the statement that failed.
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// A foreign key or other integrity constraint rejected the statement.
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// Message reported by the database.
        message: String,
    },

    /// The backend does not support the requested operation.
    #[error("Operation '{operation}' is not supported by the {backend} store")]
    Unsupported {
        /// The operation that was requested.
        operation: String,
        /// The backend name.
        backend: String,
    },

    /// Internal storage error.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Console input errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A required field was left blank.
    #[error("{field} must not be empty")]
    Empty {
        /// The field name.
        field: String,
    },

    /// The value could not be parsed as an integer.
    #[error("'{value}' is not a valid number for {field}")]
    NotANumber {
        /// The field name.
        field: String,
        /// The raw input.
        value: String,
    },

    /// The menu choice is outside the offered range.
    #[error("Option {choice} is out of range (1-{max})")]
    OutOfRange {
        /// The number entered.
        choice: i64,
        /// Highest valid option.
        max: usize,
    },
}
