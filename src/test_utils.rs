//! Test utilities and mock factories.
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::audit::OperationKind;
use crate::config::Backend;
use crate::storage::SqliteStore;
use crate::traits::{MockAuditSink, MockStudentStore, StudentStore};

/// In-memory `SQLite` store with the `alumnos` table created.
pub async fn memory_store() -> SqliteStore {
    let store = SqliteStore::new_in_memory()
        .await
        .expect("Failed to create test store");
    store.create_schema().await.expect("Failed to create schema");
    store
}

/// A mock store that reports the PostgreSQL backend. Add expectations per test.
#[must_use]
pub fn mock_postgres_store() -> MockStudentStore {
    let mut store = MockStudentStore::new();
    store.expect_backend().return_const(Backend::Postgres);
    store
}

/// A mock audit sink expecting exactly one record of `kind`.
#[must_use]
pub fn mock_audit_expecting(kind: OperationKind) -> MockAuditSink {
    let mut audit = MockAuditSink::new();
    audit
        .expect_record()
        .withf(move |event| event.kind == kind)
        .times(1)
        .returning(|_| Ok(()));
    audit
}

/// A mock audit sink that fails the test if anything is recorded.
#[must_use]
pub fn mock_audit_silent() -> MockAuditSink {
    let mut audit = MockAuditSink::new();
    audit.expect_record().never();
    audit
}
