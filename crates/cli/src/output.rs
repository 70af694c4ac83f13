//! Rendering and writing the build information document.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use build_info::BuildInformation;
use tracing::{info, warn};

use crate::config::OutputFormat;

/// Result of [`write_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document was written to a newly created file.
    Written,
    /// A file already existed at the path and was left untouched.
    AlreadyExists,
}

/// Renders the build information in the requested format.
///
/// JSON output uses two-space indentation and keeps the key order of
/// [`BuildInformation`].
pub fn render(info: &BuildInformation, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(info).context("Failed to serialise build information")
        }
    }
}

/// Writes `document` to `path`, which must not exist yet.
///
/// An existing file is not an error: it is logged and reported as
/// [`WriteOutcome::AlreadyExists`].
///
/// # Errors
///
/// Any other failure to create or write the file. A file that was created
/// but could not be fully written is removed again, so a later run does not
/// mistake it for a finished document.
pub fn write_new(path: &Path, document: &str) -> Result<WriteOutcome> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), "Output file already exists; leaving it unchanged");
            return Ok(WriteOutcome::AlreadyExists);
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to create output file '{}'", path.display()))
        }
    };

    write_or_remove(path, &mut file, document)?;

    info!(path = %path.display(), "Wrote build information");
    Ok(WriteOutcome::Written)
}

fn write_or_remove<W: Write>(path: &Path, writer: &mut W, document: &str) -> Result<()> {
    let written = writer
        .write_all(document.as_bytes())
        .and_then(|()| writer.flush());

    if let Err(e) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "Failed to remove partial output file");
        }
        return Err(e).with_context(|| format!("Failed to write output file '{}'", path.display()));
    }

    Ok(())
}
