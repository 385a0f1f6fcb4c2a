use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::document::NodeKind;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Resume file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read resume at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Resume data in {} must be a JSON object, found {found}", path.display())]
    NotAnObject { path: PathBuf, found: NodeKind },
}

/// Reads and parses the résumé data file.
///
/// A file that parses but is incomplete is NOT a load error; that is the
/// validator's job. Only unreadable files, malformed JSON and a non-object
/// root are rejected here.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    debug!(path = %path.display(), "Loading resume document");

    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if !document.is_object() {
        return Err(LoadError::NotAnObject {
            path: path.to_path_buf(),
            found: NodeKind::of(&document),
        });
    }

    debug!(
        keys = document.as_object().map(|o| o.len()).unwrap_or(0),
        "Resume document parsed"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_valid_object() {
        let file = write_temp(r#"{"name": "Ada Lovelace", "experience": []}"#);
        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc["name"], "Ada Lovelace");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("resume.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_temp(r#"{"name": "Ada", "#);
        let err = load_document(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_array_root_is_rejected() {
        let file = write_temp(r#"[{"name": "Ada"}]"#);
        let err = load_document(file.path()).unwrap_err();
        match err {
            LoadError::NotAnObject { found, .. } => assert_eq!(found, NodeKind::Array),
            other => panic!("expected NotAnObject, got {other:?}"),
        }
    }

    #[test]
    fn test_non_utf8_file_is_read_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'{', 0xff, 0xfe, b'}']).unwrap();
        let err = load_document(file.path()).unwrap_err();
        match &err {
            LoadError::Read { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("expected Read, got {other:?}"),
        }
        assert!(err.to_string().starts_with("Failed to read resume at"));
    }

    #[test]
    fn test_directory_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_incomplete_document_still_loads() {
        let file = write_temp("{}");
        assert!(load_document(file.path()).is_ok());
    }
}
