//! Record types exchanged with the stores.
//!
//! - [`Student`]: A row of `alumnos`
//! - [`NewStudent`]: Values for an insert
//! - [`Program`]: Free-text program or course reference
//! - [`Course`]: A row of `cursos`

use std::fmt;

use serde::Serialize;

/// What a student is enrolled in.
///
/// The `SQLite` schema stores a free-text program; the PostgreSQL schema
/// stores a foreign key into `cursos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Free-text program (`carrera`). `None` when left blank.
    Named(Option<String>),
    /// Reference to `cursos.id`, with the course name when it was joined.
    Course {
        /// Course id.
        id: i64,
        /// Course name.
        name: Option<String>,
    },
}

impl Program {
    /// A course reference without a resolved name.
    #[must_use]
    pub const fn course(id: i64) -> Self {
        Self::Course { id, name: None }
    }

    /// A free-text program; blank text is stored as `NULL`.
    #[must_use]
    pub fn named(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::Named(None)
        } else {
            Self::Named(Some(text))
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(Some(text)) => f.write_str(text),
            Self::Named(None) => f.write_str("-"),
            Self::Course { id, name: Some(name) } => write!(f, "{name} (#{id})"),
            Self::Course { id, name: None } => write!(f, "#{id}"),
        }
    }
}

/// Student stored in `alumnos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Primary key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Program or course.
    pub program: Program,
}

/// Values for a new student row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Program or course.
    pub program: Program,
}

impl NewStudent {
    /// Create the values for an insert.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            program,
        }
    }

    /// Attach the id assigned by the store.
    #[must_use]
    pub fn into_student(self, id: i64) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            program: self.program,
        }
    }
}

/// Course stored in `cursos`.
///
/// Serializes as the `INSERT_CURSO` audit payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Primary key.
    pub id: i64,
    /// Course name.
    pub name: String,
    /// False once the course has been deactivated.
    pub active: bool,
}
