//! Line-oriented terminal I/O and field checks.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::error::InputError;

/// Prompts and prints over any reader/writer pair.
///
/// `main` wires it to locked stdin/stdout; tests use byte buffers.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wrap a reader and a writer.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` without a newline and read one trimmed line.
    ///
    /// Returns `None` at end of input. Bytes that are not valid UTF-8 are
    /// replaced with `U+FFFD` so the field checks see them.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying reader or writer.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    /// Print one line.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Consume the console and return the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Reject blank values for a required field.
///
/// # Errors
///
/// Returns [`InputError::Empty`] if `value` is blank.
pub fn require_text(value: &str, field: &str) -> Result<String, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::Empty {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Parse a numeric id.
///
/// # Errors
///
/// Returns [`InputError::Empty`] for blank input and
/// [`InputError::NotANumber`] when it is not an integer.
pub fn parse_id(value: &str, field: &str) -> Result<i64, InputError> {
    let value = require_text(value, field)?;
    value.parse().map_err(|_| InputError::NotANumber {
        field: field.to_string(),
        value,
    })
}

/// True for an explicit yes (`y` or `yes`, any case).
#[must_use]
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
