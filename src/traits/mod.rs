//! Trait definitions for the store seams.
//!
//! This module defines:
//! - [`StudentStore`]: CRUD over students and courses
//! - [`AuditSink`]: Append-only operation log
//!
//! # Mocking
//!
//! Both traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! so menu handlers can be tested without a database.

use async_trait::async_trait;

use crate::audit::AuditEvent;
use crate::config::Backend;
use crate::error::StorageError;
use crate::storage::{Course, NewStudent, Student};

/// Student and course persistence.
///
/// Every method issues a single statement and commits it before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Which backend this store talks to.
    fn backend(&self) -> Backend;

    /// Create the tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the DDL fails.
    async fn create_schema(&self) -> Result<(), StorageError>;

    /// Insert a student and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConstraintViolation`] when the course reference
    /// does not resolve, or another [`StorageError`] if the insert fails.
    async fn insert_student(&self, student: &NewStudent) -> Result<Student, StorageError>;

    /// All students ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    async fn list_students(&self) -> Result<Vec<Student>, StorageError>;

    /// Rename a student. Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the update fails.
    async fn update_student_name(&self, id: i64, name: &str) -> Result<u64, StorageError>;

    /// Delete a student. Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the delete fails.
    async fn delete_student(&self, id: i64) -> Result<u64, StorageError>;

    /// Insert an active course.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unsupported`] on backends without courses.
    async fn insert_course(&self, name: &str) -> Result<Course, StorageError>;

    /// All courses ordered by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unsupported`] on backends without courses.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Mark a course inactive. Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unsupported`] on backends without courses.
    async fn deactivate_course(&self, id: i64) -> Result<u64, StorageError>;
}

/// Destination for audit records of mutating operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record cannot be written. Callers do not
    /// roll back the audited operation.
    async fn record(&self, event: &AuditEvent) -> Result<(), StorageError>;
}
