//! Plain-text error rendering
//!
//! Build errors name the offending schema path and the reason. Validation
//! errors render one line per failure, in report order:
//!
//! ```text
//! error: validation failed with 2 error(s)
//!   user.email: required validation failed (required)
//!   tags.1: string validation failed (string) [tags.*]
//! ```

use crate::{BuildError, Error};
use std::io::Write;

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use serde_json::json;
/// use sieve::{Validator, render_error};
///
/// let validator = Validator::default();
/// match validator.compile_declaration(&json!({"type": "literal"})) {
///     Err(e) => render_error(&e),
///     Ok(_) => {}
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr()).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    match error {
        Error::Build(err) => render_build_error(err, writer),
        Error::Validation(errors) => {
            writeln!(writer, "error: {error}")?;
            for failure in errors.iter() {
                write!(writer, "  {failure}")?;
                if let Some(expression) = &failure.array_expression_pointer {
                    write!(writer, " [{expression}]")?;
                }
                writeln!(writer)?;
            }
            Ok(())
        }
        Error::Execution(msg) => writeln!(writer, "error: {msg}"),
    }
}

/// Render an error to a String (useful for tests, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to(error, &mut buf).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_build_error(error: &BuildError, writer: &mut dyn Write) -> std::io::Result<()> {
    match error {
        BuildError::MalformedSchema { path, reason } if path.is_empty() => {
            writeln!(writer, "error: malformed schema: {reason}")
        }
        BuildError::MalformedSchema { path, reason } => {
            writeln!(writer, "error: malformed schema")?;
            writeln!(writer, "  --> {path}")?;
            writeln!(writer, "  {reason}")
        }
        BuildError::InvalidArguments { rule, reason } => {
            writeln!(writer, "error: invalid arguments for rule \"{rule}\"")?;
            writeln!(writer, "  {reason}")
        }
        other => writeln!(writer, "error: {other}"),
    }
}
