//! Menu options and parsing.

use std::fmt::Write as _;

use crate::config::Backend;
use crate::error::InputError;

/// Printed once before the first menu.
pub const BANNER: &str = "Student records manager. Enter the number of an option; Ctrl-D quits.";

/// Printed when the loop ends.
pub const GOODBYE: &str = "Leaving the application. See you next time!";

const SQLITE_MENU: [MenuOption; 6] = [
    MenuOption::CreateSchema,
    MenuOption::Insert,
    MenuOption::List,
    MenuOption::UpdateName,
    MenuOption::Delete,
    MenuOption::Exit,
];

const POSTGRES_MENU: [MenuOption; 9] = [
    MenuOption::CreateSchema,
    MenuOption::Insert,
    MenuOption::List,
    MenuOption::UpdateName,
    MenuOption::Delete,
    MenuOption::AddCourse,
    MenuOption::ListCourses,
    MenuOption::DeactivateCourse,
    MenuOption::Exit,
];

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    /// Create the tables.
    CreateSchema,
    /// Insert a student.
    Insert,
    /// List students.
    List,
    /// Rename a student.
    UpdateName,
    /// Delete a student.
    Delete,
    /// Insert a course.
    AddCourse,
    /// List courses.
    ListCourses,
    /// Soft-delete a course.
    DeactivateCourse,
    /// Leave the loop.
    Exit,
}

impl MenuOption {
    /// The options offered for a backend, in menu order.
    #[must_use]
    pub const fn for_backend(backend: Backend) -> &'static [Self] {
        match backend {
            Backend::Sqlite => &SQLITE_MENU,
            Backend::Postgres => &POSTGRES_MENU,
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateSchema => "Create tables",
            Self::Insert => "Insert student (CREATE)",
            Self::List => "List students (READ)",
            Self::UpdateName => "Update student name (UPDATE)",
            Self::Delete => "Delete student (DELETE)",
            Self::AddCourse => "Add course",
            Self::ListCourses => "List courses",
            Self::DeactivateCourse => "Deactivate course",
            Self::Exit => "Exit",
        }
    }

    /// Parse a 1-based selection.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the input is blank, not a number, or outside
    /// the menu for `backend`.
    pub fn parse(input: &str, backend: Backend) -> Result<Self, InputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InputError::Empty {
                field: "Option".into(),
            });
        }

        let choice: i64 = input.parse().map_err(|_| InputError::NotANumber {
            field: "option".into(),
            value: input.to_string(),
        })?;

        let options = Self::for_backend(backend);
        usize::try_from(choice)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| options.get(index).copied())
            .ok_or(InputError::OutOfRange {
                choice,
                max: options.len(),
            })
    }
}

/// The numbered menu for a backend.
#[must_use]
pub fn menu_text(backend: Backend) -> String {
    let rule = "=================================";
    let mut text = format!("{rule}\n          MAIN MENU ({backend})\n{rule}\n");
    for (number, option) in MenuOption::for_backend(backend).iter().enumerate() {
        let _ = writeln!(text, "{}) {}", number + 1, option.label());
    }
    text.push_str(rule);
    text
}
