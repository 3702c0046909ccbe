//! Input validation: make sure the appendix path is a readable PDF.
//!
//! pdftotext reports a missing or non-PDF file with a terse message on
//! stderr. Checking first gives the caller a typed error that names the
//! path instead.

use crate::error::ExtractError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable and starts with the `%PDF` magic.
pub fn resolve_pdf(path: &Path) -> Result<PathBuf, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(ExtractError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    // Files shorter than the magic are left for pdftotext to reject.
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() && !is_pdf_magic(&magic) {
        return Err(ExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}

/// True when `bytes` begins with the PDF file signature.
pub fn is_pdf_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_pdf_magic() {
        assert!(is_pdf_magic(b"%PDF-1.7\n"));
        assert!(!is_pdf_magic(b"<html>"));
        assert!(!is_pdf_magic(b""));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_pdf(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn html_file_is_not_a_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"<!DOCTYPE html>").unwrap();
        let err = resolve_pdf(f.path()).unwrap_err();
        match err {
            ExtractError::NotAPdf { magic, .. } => assert_eq!(&magic, b"<!DO"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pdf_file_resolves() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\n%stub").unwrap();
        assert_eq!(resolve_pdf(f.path()).unwrap(), f.path());
    }
}
