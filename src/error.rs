//! Error types for the nmra-manufacturers library.
//!
//! Every failure this crate reports is fatal: the run stops and nothing is
//! written. Malformed table rows are deliberately *not* errors; the scanner
//! folds them into the previous manufacturer's name and counts them in
//! [`crate::document::ExtractionStats`] instead.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All fatal errors returned by the nmra-manufacturers library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists, or run with --refresh to download it.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Reading the input failed for a reason other than the ones above.
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── External tool errors ──────────────────────────────────────────────
    /// The text-extraction program is not installed or not on `PATH`.
    #[error("'{program}' was not found.\nInstall poppler-utils (pdftotext) or pass --pdftotext <PATH>.")]
    ToolNotFound { program: String },

    /// The text-extraction program could not be started.
    #[error("Failed to run '{program}': {source}")]
    ToolSpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The text-extraction program ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The text-extraction program wrote something that is not UTF-8.
    #[error("'{program}' produced output that is not valid UTF-8")]
    ToolOutputNotUtf8 { program: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialised to JSON.
    #[error("Failed to serialise manufacturer document: {0}")]
    Serialize(#[from] serde_json::Error),

    // ── Refresh errors ────────────────────────────────────────────────────
    /// HTTP request was valid but the download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The standards index page has no link to the appendix.
    #[error("Could not find \"{title}\" on '{url}'. The NMRA site layout may have changed.")]
    AppendixNotFound { title: String, url: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True for failures of the external text-extraction program.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::ToolNotFound { .. }
                | ExtractError::ToolSpawnFailed { .. }
                | ExtractError::ToolFailed { .. }
                | ExtractError::ToolOutputNotUtf8 { .. }
        )
    }
}
