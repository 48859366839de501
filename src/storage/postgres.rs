//! PostgreSQL student store.
//!
//! The cloud variant: `alumnos` references `cursos` by foreign key, courses
//! are soft-deleted through `activo`, and [`AuditSink`] appends to
//! `operaciones_log`.

#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use super::query_error;
use super::types::{Course, NewStudent, Program, Student};
use crate::audit::AuditEvent;
use crate::config::{Backend, SecretString};
use crate::error::StorageError;
use crate::traits::{AuditSink, StudentStore};

const SCHEMA: &str = include_str!("../../migrations/postgres/001_schema.sql");

/// PostgreSQL storage backend.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pub(crate) pool: PgPool,
}

impl PostgresStore {
    /// Connect using the given connection string.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn new(database_url: &SecretString) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url.expose())
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to connect to {}: {e}", database_url.masked()),
            })?;

        tracing::info!(url = %database_url.masked(), "connected to postgres");
        Ok(Self { pool })
    }

    /// Get a clone of the connection pool.
    #[must_use]
    pub fn get_pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// `SERIAL` columns are 32-bit; ids outside that range match no row.
fn to_key(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

#[async_trait]
impl StudentStore for PostgresStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    async fn create_schema(&self) -> Result<(), StorageError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("CREATE TABLE cursos/alumnos/operaciones_log", &e))?;
        tracing::debug!("cursos, alumnos and operaciones_log ready");
        Ok(())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<Student, StorageError> {
        let curso_id = match &student.program {
            Program::Course { id, .. } => {
                Some(to_key(*id).ok_or_else(|| StorageError::ConstraintViolation {
                    message: format!("course id {id} does not exist"),
                })?)
            }
            Program::Named(None) => None,
            Program::Named(Some(_)) => {
                return Err(StorageError::Unsupported {
                    operation: "free-text program".to_string(),
                    backend: Backend::Postgres.as_str().to_string(),
                })
            }
        };

        let row = sqlx::query(
            "INSERT INTO alumnos (name, email, curso_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(curso_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error("INSERT alumnos", &e))?;

        let id: i32 = row.get("id");
        tracing::debug!(id, "inserted student");
        Ok(student.clone().into_student(i64::from(id)))
    }

    async fn list_students(&self) -> Result<Vec<Student>, StorageError> {
        let rows = sqlx::query(
            "SELECT a.id, a.name, a.email, a.curso_id, c.name AS curso \
             FROM alumnos a LEFT JOIN cursos c ON c.id = a.curso_id \
             ORDER BY a.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("SELECT alumnos", &e))?;

        let students: Vec<Student> = rows
            .iter()
            .map(|row| {
                let id: i32 = row.get("id");
                let curso_id: Option<i32> = row.get("curso_id");
                let program = match curso_id {
                    Some(curso_id) => Program::Course {
                        id: i64::from(curso_id),
                        name: row.get("curso"),
                    },
                    None => Program::Named(None),
                };
                Student {
                    id: i64::from(id),
                    name: row.get("name"),
                    email: row.get("email"),
                    program,
                }
            })
            .collect();

        tracing::debug!(count = students.len(), "listed students");
        Ok(students)
    }

    async fn update_student_name(&self, id: i64, name: &str) -> Result<u64, StorageError> {
        let Some(key) = to_key(id) else {
            return Ok(0);
        };

        let result = sqlx::query("UPDATE alumnos SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("UPDATE alumnos", &e))?;

        tracing::debug!(id, rows = result.rows_affected(), "renamed student");
        Ok(result.rows_affected())
    }

    async fn delete_student(&self, id: i64) -> Result<u64, StorageError> {
        let Some(key) = to_key(id) else {
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM alumnos WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("DELETE alumnos", &e))?;

        tracing::debug!(id, rows = result.rows_affected(), "deleted student");
        Ok(result.rows_affected())
    }

    async fn insert_course(&self, name: &str) -> Result<Course, StorageError> {
        let row = sqlx::query("INSERT INTO cursos (name) VALUES ($1) RETURNING id, activo")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("INSERT cursos", &e))?;

        let id: i32 = row.get("id");
        tracing::debug!(id, "inserted course");
        Ok(Course {
            id: i64::from(id),
            name: name.to_string(),
            active: row.get("activo"),
        })
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query("SELECT id, name, activo FROM cursos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("SELECT cursos", &e))?;

        Ok(rows
            .iter()
            .map(|row| Course {
                id: i64::from(row.get::<i32, _>("id")),
                name: row.get("name"),
                active: row.get("activo"),
            })
            .collect())
    }

    async fn deactivate_course(&self, id: i64) -> Result<u64, StorageError> {
        let Some(key) = to_key(id) else {
            return Ok(0);
        };

        let result = sqlx::query("UPDATE cursos SET activo = FALSE WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("UPDATE cursos", &e))?;

        tracing::debug!(id, rows = result.rows_affected(), "deactivated course");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AuditSink for PostgresStore {
    async fn record(&self, event: &AuditEvent) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO operaciones_log (operation, details) VALUES ($1, $2)")
            .bind(event.kind.as_str())
            .bind(&event.details)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("INSERT operaciones_log", &e))?;

        tracing::debug!(operation = %event.kind, "audit record written");
        Ok(())
    }
}
