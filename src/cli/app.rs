//! Menu dispatcher and handlers.

use std::io::{self, BufRead, Write};

use super::console::{is_confirmation, parse_id, require_text, Console};
use super::menu::{menu_text, MenuOption, BANNER, GOODBYE};
use super::render::{course_line, rows_affected, student_line};
use crate::audit::AuditEvent;
use crate::config::Backend;
use crate::error::AppError;
use crate::storage::{NewStudent, Program};
use crate::traits::{AuditSink, StudentStore};

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Read the next answer, or leave the loop at end of input.
macro_rules! ask {
    ($console:expr, $label:expr) => {
        match $console.prompt($label)? {
            Some(answer) => answer,
            None => return Ok(Flow::Exit),
        }
    };
}

/// Print `[TAG - ERROR] <err>` and go back to the menu.
macro_rules! bail_to_menu {
    ($console:expr, $tag:expr, $err:expr) => {{
        $console.line(format!("[{} - ERROR] {}", $tag, $err))?;
        return Ok(Flow::Continue);
    }};
}

/// The menu application over a store and an audit sink.
#[derive(Debug)]
pub struct App<S, A> {
    store: S,
    audit: A,
}

impl<S: StudentStore, A: AuditSink> App<S, A> {
    /// Create the application.
    pub const fn new(store: S, audit: A) -> Self {
        Self { store, audit }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the terminal cannot be read or written.
    /// Store and input errors are printed and never returned.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), AppError> {
        let backend = self.store.backend();
        let max = MenuOption::for_backend(backend).len();
        tracing::info!(%backend, "menu loop started");
        console.line(BANNER)?;

        loop {
            console.line(menu_text(backend))?;
            let Some(raw) = console.prompt(&format!("Choose an option (1-{max}): "))? else {
                break;
            };

            let option = match MenuOption::parse(&raw, backend) {
                Ok(option) => option,
                Err(e) => {
                    tracing::debug!(input = %raw, "rejected menu input");
                    console.line(format!("[ERROR] {e}. Try again."))?;
                    continue;
                }
            };

            if self.dispatch(option, console).await? == Flow::Exit {
                break;
            }
        }

        console.line(GOODBYE)?;
        tracing::info!("menu loop finished");
        Ok(())
    }

    /// Run the handler for one menu option.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] on terminal failures only.
    pub async fn dispatch<R: BufRead, W: Write>(
        &self,
        option: MenuOption,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        tracing::debug!(?option, "dispatching");
        match option {
            MenuOption::CreateSchema => self.create_schema(console).await,
            MenuOption::Insert => self.insert_student(console).await,
            MenuOption::List => self.list_students(console).await,
            MenuOption::UpdateName => self.update_student_name(console).await,
            MenuOption::Delete => self.delete_student(console).await,
            MenuOption::AddCourse => self.add_course(console).await,
            MenuOption::ListCourses => self.list_courses(console).await,
            MenuOption::DeactivateCourse => self.deactivate_course(console).await,
            MenuOption::Exit => Ok(Flow::Exit),
        }
    }

    async fn create_schema<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        match self.store.create_schema().await {
            Ok(()) => console.line("[OK] Tables created (or already exist).")?,
            Err(e) => bail_to_menu!(console, "CREATE", e),
        }
        Ok(Flow::Continue)
    }

    async fn insert_student<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        console.line("\nRegistering a student. Please enter the details:")?;
        let name = ask!(console, "  Name: ");
        let email = ask!(console, "  Email: ");

        let program = match self.store.backend() {
            Backend::Sqlite => Program::named(ask!(console, "  Program: ")),
            Backend::Postgres => match parse_id(&ask!(console, "  Course ID: "), "Course ID") {
                Ok(id) => Program::course(id),
                Err(e) => bail_to_menu!(console, "INSERT", e),
            },
        };

        let (name, email) = match (require_text(&name, "Name"), require_text(&email, "Email")) {
            (Ok(name), Ok(email)) => (name, email),
            (Err(e), _) | (_, Err(e)) => bail_to_menu!(console, "INSERT", e),
        };

        let student = match self
            .store
            .insert_student(&NewStudent::new(name, email, program))
            .await
        {
            Ok(student) => student,
            Err(e) => bail_to_menu!(console, "INSERT", e),
        };

        console.line(format!(
            "[INSERT] Student inserted with ID={}. {}",
            student.id,
            rows_affected(1)
        ))?;
        self.record_audit(&AuditEvent::student_inserted(&student), console)
            .await?;
        Ok(Flow::Continue)
    }

    async fn list_students<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let students = match self.store.list_students().await {
            Ok(students) => students,
            Err(e) => bail_to_menu!(console, "READ", e),
        };

        if students.is_empty() {
            console.line("[READ] No records in the table.")?;
        } else {
            console.line("\n[READ] Records in table 'alumnos':")?;
            for student in &students {
                console.line(student_line(student))?;
            }
        }
        console.line("")?;
        Ok(Flow::Continue)
    }

    async fn update_student_name<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        console.line("\nUpdating a student.")?;
        let raw_id = ask!(console, "  ID of the student to update: ");
        let id = match parse_id(&raw_id, "ID") {
            Ok(id) => id,
            Err(e) => bail_to_menu!(console, "UPDATE", e),
        };
        let name = match require_text(&ask!(console, "  New name: "), "Name") {
            Ok(name) => name,
            Err(e) => bail_to_menu!(console, "UPDATE", e),
        };

        let rows = match self.store.update_student_name(id, &name).await {
            Ok(rows) => rows,
            Err(e) => bail_to_menu!(console, "UPDATE", e),
        };

        if rows > 0 {
            console.line(format!(
                "[UPDATE] Student ID={id} is now named '{name}'. {}",
                rows_affected(rows)
            ))?;
        } else {
            console.line(format!(
                "[UPDATE] No student found with ID={id}. {}",
                rows_affected(rows)
            ))?;
        }
        self.record_audit(&AuditEvent::student_renamed(id, &name, rows), console)
            .await?;
        Ok(Flow::Continue)
    }

    async fn delete_student<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        console.line("\nDeleting a student.")?;
        let raw_id = ask!(console, "  ID of the student to delete: ");
        let id = match parse_id(&raw_id, "ID") {
            Ok(id) => id,
            Err(e) => bail_to_menu!(console, "DELETE", e),
        };

        let answer = ask!(
            console,
            &format!("  Delete student ID={id}? This cannot be undone (y/N): ")
        );
        if !is_confirmation(&answer) {
            console.line("[DELETE] Cancelled. Nothing was deleted.")?;
            return Ok(Flow::Continue);
        }

        let rows = match self.store.delete_student(id).await {
            Ok(rows) => rows,
            Err(e) => bail_to_menu!(console, "DELETE", e),
        };

        if rows > 0 {
            console.line(format!(
                "[DELETE] Student ID={id} deleted. {}",
                rows_affected(rows)
            ))?;
        } else {
            console.line(format!(
                "[DELETE] No student found with ID={id}. {}",
                rows_affected(rows)
            ))?;
        }
        self.record_audit(&AuditEvent::student_deleted(id, rows), console)
            .await?;
        Ok(Flow::Continue)
    }

    async fn add_course<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let name = match require_text(&ask!(console, "  Course name: "), "Course name") {
            Ok(name) => name,
            Err(e) => bail_to_menu!(console, "COURSE", e),
        };

        let course = match self.store.insert_course(&name).await {
            Ok(course) => course,
            Err(e) => bail_to_menu!(console, "COURSE", e),
        };

        console.line(format!(
            "[COURSE] Course '{}' created with ID={}.",
            course.name, course.id
        ))?;
        self.record_audit(&AuditEvent::course_inserted(&course), console)
            .await?;
        Ok(Flow::Continue)
    }

    async fn list_courses<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let courses = match self.store.list_courses().await {
            Ok(courses) => courses,
            Err(e) => bail_to_menu!(console, "COURSES", e),
        };

        if courses.is_empty() {
            console.line("[COURSES] No courses registered.")?;
        } else {
            console.line("\n[COURSES] Records in table 'cursos':")?;
            for course in &courses {
                console.line(course_line(course))?;
            }
        }
        console.line("")?;
        Ok(Flow::Continue)
    }

    async fn deactivate_course<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let id = match parse_id(&ask!(console, "  ID of the course to deactivate: "), "ID") {
            Ok(id) => id,
            Err(e) => bail_to_menu!(console, "COURSE", e),
        };

        let rows = match self.store.deactivate_course(id).await {
            Ok(rows) => rows,
            Err(e) => bail_to_menu!(console, "COURSE", e),
        };

        if rows > 0 {
            console.line(format!(
                "[COURSE] Course ID={id} deactivated. {}",
                rows_affected(rows)
            ))?;
        } else {
            console.line(format!(
                "[COURSE] No course found with ID={id}. {}",
                rows_affected(rows)
            ))?;
        }
        self.record_audit(&AuditEvent::course_deactivated(id, rows), console)
            .await?;
        Ok(Flow::Continue)
    }

    /// Record a completed operation. Failures are reported, never undone.
    async fn record_audit<R: BufRead, W: Write>(
        &self,
        event: &AuditEvent,
        console: &mut Console<R, W>,
    ) -> io::Result<()> {
        if let Err(e) = self.audit.record(event).await {
            tracing::warn!(operation = %event.kind, error = %e, "audit record not written");
            console.line(format!("[AUDIT - WARNING] {e}"))?;
        }
        Ok(())
    }
}
