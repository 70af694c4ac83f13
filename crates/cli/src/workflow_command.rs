//! GitHub Actions workflow commands.
//!
//! The runner scans a step's stdout for lines of the form
//! `::command::message` and turns them into annotations.

use std::io::{self, Write};

/// Escapes a message so it survives as the data part of a workflow command.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats an `::error::` command.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Marks the step as failed by emitting an error annotation on stdout.
///
/// The caller is responsible for exiting with a non-zero status.
pub fn set_failed(message: &str) {
    let mut stdout = io::stdout().lock();
    // Nothing sensible to do if stdout is gone; the exit status still fails the step.
    let _ = writeln!(stdout, "{}", error_command(message));
}
