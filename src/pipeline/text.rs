//! Text rendering: run `pdftotext -layout` and capture its stdout.
//!
//! Layout mode keeps table columns on one line separated by runs of spaces,
//! which is what the row pattern in [`super::scan`] relies on. The call
//! blocks until the tool exits; there is no timeout.

use crate::error::ExtractError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Render `pdf` to plain text with `program` (normally `pdftotext`).
pub fn render_text(program: &str, pdf: &Path) -> Result<String, ExtractError> {
    debug!("Running {} -layout {} -", program, pdf.display());

    let output = Command::new(program)
        .arg("-layout")
        .arg(pdf)
        .arg("-")
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::ToolNotFound {
                    program: program.to_string(),
                }
            } else {
                ExtractError::ToolSpawnFailed {
                    program: program.to_string(),
                    source: e,
                }
            }
        })?;

    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8(output.stdout).map_err(|_| ExtractError::ToolOutputNotUtf8 {
        program: program.to_string(),
    })?;

    debug!("{} produced {} bytes of text", program, text.len());
    Ok(text)
}
