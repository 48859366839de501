//! Operation audit records.
//!
//! Each mutating menu action produces one [`AuditEvent`]: an operation kind
//! plus a JSON payload of the fields it touched. The PostgreSQL store writes
//! them to `operaciones_log`; the `SQLite` variant uses [`NoAudit`].

use std::fmt;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StorageError;
use crate::storage::{Course, Program, Student};
use crate::traits::AuditSink;

/// Kind of mutating operation, stored in `operaciones_log.operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Student inserted.
    Insert,
    /// Student renamed.
    Update,
    /// Student deleted.
    Delete,
    /// Course inserted.
    InsertCourse,
    /// Course deactivated.
    DeactivateCourse,
}

impl OperationKind {
    /// Value written to the `operation` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::InsertCourse => "INSERT_CURSO",
            Self::DeactivateCourse => "DEACTIVATE_CURSO",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Operation kind.
    pub kind: OperationKind,
    /// Changed fields.
    pub details: Value,
}

impl AuditEvent {
    /// Student inserted.
    #[must_use]
    pub fn student_inserted(student: &Student) -> Self {
        let curso_id = match &student.program {
            Program::Course { id, .. } => json!(id),
            Program::Named(_) => Value::Null,
        };
        Self {
            kind: OperationKind::Insert,
            details: json!({
                "id": student.id,
                "name": student.name,
                "email": student.email,
                "curso_id": curso_id,
            }),
        }
    }

    /// Student renamed.
    #[must_use]
    pub fn student_renamed(id: i64, name: &str, rows_affected: u64) -> Self {
        Self {
            kind: OperationKind::Update,
            details: json!({ "id": id, "name": name, "rows_affected": rows_affected }),
        }
    }

    /// Student deleted.
    #[must_use]
    pub fn student_deleted(id: i64, rows_affected: u64) -> Self {
        Self {
            kind: OperationKind::Delete,
            details: json!({ "id": id, "rows_affected": rows_affected }),
        }
    }

    /// Course inserted.
    #[must_use]
    pub fn course_inserted(course: &Course) -> Self {
        Self {
            kind: OperationKind::InsertCourse,
            details: json!(course),
        }
    }

    /// Course deactivated.
    #[must_use]
    pub fn course_deactivated(id: i64, rows_affected: u64) -> Self {
        Self {
            kind: OperationKind::DeactivateCourse,
            details: json!({ "id": id, "rows_affected": rows_affected }),
        }
    }
}

/// Audit sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudit;

#[async_trait]
impl AuditSink for NoAudit {
    async fn record(&self, event: &AuditEvent) -> Result<(), StorageError> {
        tracing::trace!(operation = %event.kind, "audit disabled, record dropped");
        Ok(())
    }
}
