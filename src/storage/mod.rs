//! Storage backends.
//!
//! This module provides:
//! - [`SqliteStore`]: local file, free-text programs
//! - [`PostgresStore`]: courses, foreign keys and the operation log
//! - Record types shared by both
//!
//! # Architecture
//!
//! Both stores use `sqlx` with a pool of a single connection held for the
//! process lifetime. Every operation is one parameterized statement in
//! autocommit mode.
//!
//! # Example
//!
//! ```ignore
//! use student_records::storage::{NewStudent, Program, SqliteStore};
//! use student_records::traits::StudentStore;
//!
//! let store = SqliteStore::new("alumnos_cli.db").await?;
//! store.create_schema().await?;
//! let ana = NewStudent::new("Ana", "ana@example.com", Program::named("Física"));
//! store.insert_student(&ana).await?;
//! ```

mod postgres;
mod sqlite;
mod types;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use types::{Course, NewStudent, Program, Student};

use crate::error::StorageError;

/// Convert a driver error, singling out foreign key violations.
pub(crate) fn query_error(query: &str, error: &sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = error {
        if db.is_foreign_key_violation() {
            return StorageError::ConstraintViolation {
                message: db.message().to_string(),
            };
        }
    }
    StorageError::QueryFailed {
        query: query.to_string(),
        message: error.to_string(),
    }
}
