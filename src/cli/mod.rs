//! Interactive menu.
//!
//! A blocking loop over a numbered menu read from standard input. Each
//! selection runs one handler, which prompts for its fields, issues one
//! statement and prints the outcome.

mod app;
mod console;
mod menu;
mod render;


pub use app::{App, Flow};
pub use console::{is_confirmation, parse_id, require_text, Console};
pub use menu::{menu_text, MenuOption, BANNER, GOODBYE};
pub use render::{course_line, rows_affected, student_line};
