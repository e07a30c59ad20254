//! Typed error variants for resource operations.
//!
//! Resource code returns these where an I/O failure needs the path it
//! happened on; callers convert to [`anyhow::Error`] via `?`.

use std::io;

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A file that must be read could not be read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A file could not be written.
    #[error("cannot write {path}: {source}")]
    Unwritable {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Read `path` as text; a missing file reads as `None`.
///
/// # Errors
///
/// Returns [`ResourceError::Unreadable`] for any failure other than
/// absence.
pub fn read_optional(path: &std::path::Path) -> Result<Option<String>, ResourceError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResourceError::Unreadable {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_display() {
        let e = ResourceError::Unreadable {
            path: "/h/.zshrc".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(e.to_string().starts_with("cannot read /h/.zshrc"));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent")).unwrap().is_none());
        std::fs::write(dir.path().join("present"), "x").unwrap();
        assert_eq!(
            read_optional(&dir.path().join("present")).unwrap().as_deref(),
            Some("x")
        );
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_optional(dir.path()),
            Err(ResourceError::Unreadable { .. })
        ));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_error_is_send_sync() {
        assert_send_sync::<ResourceError>();
        let _anyhow: anyhow::Error = ResourceError::Unwritable {
            path: "x".to_string(),
            source: io::Error::from(io::ErrorKind::Other),
        }
        .into();
    }
}
