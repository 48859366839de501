//! Student Records
//!
//! A menu-driven command-line manager for student records, backed by a
//! local `SQLite` file or by PostgreSQL.
//!
//! # Features
//!
//! - Create, list, rename and delete students
//! - PostgreSQL variant: courses with soft delete, foreign-key checked
//!   enrollment, and an append-only operation log
//! - Parameterized statements only, committed one at a time
//!
//! # Quick Start
//!
//! ```bash
//! ./student-records                                   # SQLite, ./alumnos_cli.db
//! STUDENT_STORE=postgres DATABASE_URL=postgres://... ./student-records
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   stdin    ┌──────────────┐   one statement   ┌──────────────┐
//! │   User   │───────────▶│  Menu loop   │──────────────────▶│ StudentStore │
//! │          │◀───────────│  (cli::App)  │──────────────────▶│  AuditSink   │
//! └──────────┘   stdout   └──────────────┘                   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod test_utils;
