//! JSON output: serialise the document and replace the destination file.

use crate::document::ManufacturerDocument;
use crate::error::ExtractError;
use std::path::Path;
use tracing::debug;

/// Render the document as 2-space-indented JSON with a trailing newline.
pub fn to_json(document: &ManufacturerDocument) -> Result<String, ExtractError> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

/// Write `document` to `path`, overwriting whatever is there.
///
/// The JSON goes to a sibling `.json.tmp` file which is then renamed over
/// `path`, so an interrupted run never leaves half a file behind. A new file
/// gets the umask default mode; an existing file keeps its permissions.
pub fn write_document(document: &ManufacturerDocument, path: &Path) -> Result<(), ExtractError> {
    let json = to_json(document)?;
    let write_err = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(write_err)?;

    if let Ok(meta) = std::fs::metadata(path) {
        std::fs::set_permissions(&tmp_path, meta.permissions()).map_err(write_err)?;
    }

    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ManufacturerRecord;

    fn doc() -> ManufacturerDocument {
        ManufacturerDocument {
            origin: "https://www.nmra.org/".into(),
            title: "NMRA S-9.2.2, Appendix A".into(),
            revision: None,
            manufacturers: vec![ManufacturerRecord {
                id: 7,
                name: "Acme Corp".into(),
                countries: vec!["US".into()],
            }],
        }
    }

    #[test]
    fn json_is_two_space_indented() {
        let json = to_json(&doc()).unwrap();
        assert!(json.contains("\n  \"manufacturers\": [\n    {\n      \"id\": 7,"), "got: {json}");
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn creates_parent_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lmrs/core/data/manufacturers.json");

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale").unwrap();

        write_document(&doc(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let back: ManufacturerDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(back, doc());

        // no temp files left next to the output
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn existing_file_mode_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manufacturers.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_document(&doc(), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manufacturers.json");
        // umask never strips owner bits, and std::fs::write asks for 0666
        let expected = {
            let reference = dir.path().join("umask-check");
            std::fs::write(&reference, "").unwrap();
            std::fs::metadata(&reference).unwrap().permissions().mode() & 0o777
        };

        write_document(&doc(), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }
}
