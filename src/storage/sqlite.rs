//! `SQLite` student store.
//!
//! The local variant: a single `alumnos` table with a free-text `carrera`
//! column. Courses and the operation log do not exist here.

#![allow(clippy::missing_errors_doc)]

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::query_error;
use super::types::{Course, NewStudent, Program, Student};
use crate::config::Backend;
use crate::error::StorageError;
use crate::traits::StudentStore;

const SCHEMA: &str = include_str!("../../migrations/sqlite/001_alumnos.sql");

/// `SQLite` storage backend.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file at `database_path`.
    ///
    /// Tables are not created here; that is [`StudentStore::create_schema`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn new(database_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = database_path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create database directory: {e}"),
            })?;
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", path.display()))
                .map_err(|e| StorageError::ConnectionFailed {
                    message: format!("Invalid database path: {e}"),
                })?
                .journal_mode(SqliteJournalMode::Wal)
                .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to connect to database: {e}"),
            })?;

        tracing::info!(path = %path.display(), "opened sqlite database");
        Ok(Self { pool })
    }

    /// Open an in-memory database. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn new_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::ConnectionFailed {
                message: format!("Invalid memory database options: {e}"),
            }
        })?;

        // One connection: every new in-memory connection is a fresh database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create in-memory database: {e}"),
            })?;

        Ok(Self { pool })
    }

    /// Remove the database file and its WAL side files, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if a file exists but cannot be removed.
    pub fn reset(database_path: impl AsRef<Path>) -> Result<bool, StorageError> {
        let path = database_path.as_ref();
        let existed = path.exists();
        let mut side_files = Vec::with_capacity(3);
        side_files.push(path.to_path_buf());
        for suffix in ["-wal", "-shm"] {
            let mut name = path.as_os_str().to_owned();
            name.push(suffix);
            side_files.push(name.into());
        }

        for file in side_files.iter().filter(|f| f.exists()) {
            std::fs::remove_file(file).map_err(|e| StorageError::Internal {
                message: format!("Failed to remove {}: {e}", file.display()),
            })?;
        }

        if existed {
            tracing::info!(path = %path.display(), "removed existing database for a clean start");
        }
        Ok(existed)
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn unsupported(operation: &str) -> StorageError {
        StorageError::Unsupported {
            operation: operation.to_string(),
            backend: Backend::Sqlite.as_str().to_string(),
        }
    }
}

#[async_trait]
impl StudentStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn create_schema(&self) -> Result<(), StorageError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("CREATE TABLE alumnos", &e))?;
        tracing::debug!("alumnos table ready");
        Ok(())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<Student, StorageError> {
        let carrera = match &student.program {
            Program::Named(text) => text.as_deref(),
            Program::Course { .. } => return Err(Self::unsupported("course reference")),
        };

        let result = sqlx::query("INSERT INTO alumnos (nombre, email, carrera) VALUES (?, ?, ?)")
            .bind(&student.name)
            .bind(&student.email)
            .bind(carrera)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("INSERT alumnos", &e))?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "inserted student");
        Ok(student.clone().into_student(id))
    }

    async fn list_students(&self) -> Result<Vec<Student>, StorageError> {
        let rows = sqlx::query("SELECT id, nombre, email, carrera FROM alumnos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("SELECT alumnos", &e))?;

        let students: Vec<Student> = rows
            .iter()
            .map(|row| Student {
                id: row.get("id"),
                name: row.get("nombre"),
                email: row.get("email"),
                program: Program::Named(row.get("carrera")),
            })
            .collect();

        tracing::debug!(count = students.len(), "listed students");
        Ok(students)
    }

    async fn update_student_name(&self, id: i64, name: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("UPDATE alumnos SET nombre = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("UPDATE alumnos", &e))?;

        tracing::debug!(id, rows = result.rows_affected(), "renamed student");
        Ok(result.rows_affected())
    }

    async fn delete_student(&self, id: i64) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM alumnos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("DELETE alumnos", &e))?;

        tracing::debug!(id, rows = result.rows_affected(), "deleted student");
        Ok(result.rows_affected())
    }

    async fn insert_course(&self, _name: &str) -> Result<Course, StorageError> {
        Err(Self::unsupported("insert_course"))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        Err(Self::unsupported("list_courses"))
    }

    async fn deactivate_course(&self, _id: i64) -> Result<u64, StorageError> {
        Err(Self::unsupported("deactivate_course"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::memory_store as test_store;
    use serial_test::serial;
    use tempfile::TempDir;

    fn new_student(name: &str, email: &str, carrera: &str) -> NewStudent {
        NewStudent::new(name, email, Program::named(carrera))
    }

    #[tokio::test]
    async fn test_new_in_memory() {
        let store = SqliteStore::new_in_memory().await;
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let store = test_store().await;
        assert!(store.create_schema().await.is_ok());
        assert_eq!(store.backend(), Backend::Sqlite);
    }

    #[tokio::test]
    async fn test_insert_before_schema_fails() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let err = store
            .insert_student(&new_student("Ana", "ana@example.com", "Física"))
            .await
            .unwrap_err();
        match err {
            StorageError::QueryFailed { query, message } => {
                assert_eq!(query, "INSERT alumnos");
                assert!(message.contains("alumnos"));
            }
            other => panic!("Expected QueryFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list() {
        let store = test_store().await;
        let inserted = store
            .insert_student(&new_student("Ana", "ana@example.com", "Física"))
            .await
            .unwrap();
        assert_eq!(inserted.id, 1);

        let students = store.list_students().await.unwrap();
        assert_eq!(students, vec![inserted]);
    }

    #[tokio::test]
    async fn test_insert_blank_program_is_null() {
        let store = test_store().await;
        store
            .insert_student(&new_student("Ana", "ana@example.com", ""))
            .await
            .unwrap();

        let students = store.list_students().await.unwrap();
        assert_eq!(students[0].program, Program::Named(None));
    }

    #[tokio::test]
    async fn test_insert_course_reference_unsupported() {
        let store = test_store().await;
        let err = store
            .insert_student(&NewStudent::new("Ana", "a@x", Program::course(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = test_store().await;
        assert!(store.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_name_only_touches_target() {
        let store = test_store().await;
        let ana = store
            .insert_student(&new_student("Ana", "ana@example.com", "Física"))
            .await
            .unwrap();
        let luis = store
            .insert_student(&new_student("Luis", "luis@example.com", "Química"))
            .await
            .unwrap();

        let rows = store.update_student_name(ana.id, "Ana María").await.unwrap();
        assert_eq!(rows, 1);

        let students = store.list_students().await.unwrap();
        assert_eq!(students[0].name, "Ana María");
        assert_eq!(students[0].email, ana.email);
        assert_eq!(students[0].program, ana.program);
        assert_eq!(students[1], luis);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let store = test_store().await;
        let rows = store.update_student_name(42, "Nadie").await.unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = test_store().await;
        let ana = store
            .insert_student(&new_student("Ana", "ana@example.com", "Física"))
            .await
            .unwrap();
        let luis = store
            .insert_student(&new_student("Luis", "luis@example.com", "Química"))
            .await
            .unwrap();

        assert_eq!(store.delete_student(ana.id).await.unwrap(), 1);
        assert_eq!(store.list_students().await.unwrap(), vec![luis]);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_zero() {
        let store = test_store().await;
        assert_eq!(store.delete_student(1234).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = test_store().await;
        let first = store
            .insert_student(&new_student("Ana", "a@x", ""))
            .await
            .unwrap();
        store.delete_student(first.id).await.unwrap();
        let second = store
            .insert_student(&new_student("Luis", "l@x", ""))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_course_operations_unsupported() {
        let store = test_store().await;
        assert!(matches!(
            store.insert_course("Álgebra").await,
            Err(StorageError::Unsupported { .. })
        ));
        assert!(matches!(
            store.list_courses().await,
            Err(StorageError::Unsupported { .. })
        ));
        assert!(matches!(
            store.deactivate_course(1).await,
            Err(StorageError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_new_with_nested_path() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("deeply").join("nested").join("alumnos.db");

        let store = SqliteStore::new(&db_path).await;
        assert!(store.is_ok());
        assert!(db_path.exists());
        store.unwrap().close().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_file_persists_between_opens() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("alumnos.db");

        let store = SqliteStore::new(&db_path).await.unwrap();
        store.create_schema().await.unwrap();
        store
            .insert_student(&new_student("Ana", "a@x", "Física"))
            .await
            .unwrap();
        store.close().await;

        let reopened = SqliteStore::new(&db_path).await.unwrap();
        assert_eq!(reopened.list_students().await.unwrap().len(), 1);
        reopened.close().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_reset_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("alumnos.db");

        let store = SqliteStore::new(&db_path).await.unwrap();
        store.create_schema().await.unwrap();
        store.close().await;

        assert!(SqliteStore::reset(&db_path).unwrap());
        assert!(!db_path.exists());
        assert!(!SqliteStore::reset(&db_path).unwrap());
    }
}
