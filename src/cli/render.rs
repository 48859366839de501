//! Row formatting.

use crate::storage::{Course, Student};

/// One student as a table line.
#[must_use]
pub fn student_line(student: &Student) -> String {
    format!(
        "  ID: {} | Name: {} | Email: {} | Program: {}",
        student.id, student.name, student.email, student.program
    )
}

/// One course as a table line.
#[must_use]
pub fn course_line(course: &Course) -> String {
    let status = if course.active { "active" } else { "inactive" };
    format!("  ID: {} | Name: {} | Status: {status}", course.id, course.name)
}

/// `(1 row affected)` / `(0 rows affected)`.
#[must_use]
pub fn rows_affected(rows: u64) -> String {
    if rows == 1 {
        "(1 row affected)".to_string()
    } else {
        format!("({rows} rows affected)")
    }
}
