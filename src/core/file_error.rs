//! File errors that remember which file was touched and why.
//!
//! Descriptor reads and writes attach their purpose at the call site, so the CLI
//! can tell a missing `pom.xml` apart from a permission problem without parsing
//! `io::Error` messages.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What was being done to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Canonicalize,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Read => "reading",
            Self::Write => "writing",
            Self::Canonicalize => "resolving",
        })
    }
}

/// An I/O failure on a known file.
#[derive(Error, Debug)]
#[error("{operation} {} failed while {purpose}", file_path.display())]
pub struct FileOperationError {
    pub operation: FileOperation,
    pub file_path: PathBuf,
    /// What the caller was doing, e.g. "loading descriptor"
    pub purpose: String,
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    #[must_use]
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            source,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == ErrorKind::NotFound
    }

    /// Multi-line explanation for the `details` line of an error report.
    #[must_use]
    pub fn user_message(&self) -> String {
        let head = format!(
            "Failed {} '{}' while {}",
            self.operation,
            self.file_path.display(),
            self.purpose
        );

        let hint = match self.source.kind() {
            ErrorKind::NotFound if self.file_path.ends_with("pom.xml") => {
                "The file does not exist. Point --pom at the descriptor to edit.".to_string()
            }
            ErrorKind::NotFound => "The file does not exist.".to_string(),
            ErrorKind::PermissionDenied => {
                format!("Permission denied for {}", self.file_path.display())
            }
            ErrorKind::InvalidData => "Descriptors must be UTF-8 (or ASCII) encoded.".to_string(),
            _ => self.source.to_string(),
        };

        format!("{head}\n{hint}")
    }
}

/// Attach a file and purpose to an `io::Result`.
pub trait FileResultExt<T> {
    /// # Errors
    ///
    /// Returns the original error wrapped in a [`FileOperationError`].
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for std::io::Result<T> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError::new(operation, file_path, purpose, source))
    }
}

/// `std::fs` calls that return [`FileOperationError`].
pub struct FileOps;

impl FileOps {
    /// # Errors
    ///
    /// Returns the read failure with `path` and `purpose` attached.
    pub fn read_with_context(path: &Path, purpose: &str) -> Result<Vec<u8>, FileOperationError> {
        std::fs::read(path).with_file_context(FileOperation::Read, path, purpose)
    }

    /// # Errors
    ///
    /// Returns the failure with `path` and `purpose` attached.
    pub fn canonicalize_with_context(
        path: &Path,
        purpose: &str,
    ) -> Result<PathBuf, FileOperationError> {
        std::fs::canonicalize(path).with_file_context(FileOperation::Canonicalize, path, purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_missing_descriptor_message() {
        let error = FileOperationError::new(
            FileOperation::Read,
            "app/pom.xml",
            "loading descriptor",
            Error::new(ErrorKind::NotFound, "file not found"),
        );

        assert!(error.is_not_found());
        let message = error.user_message();
        assert!(message.starts_with("Failed reading 'app/pom.xml' while loading descriptor"));
        assert!(message.contains("--pom"));
        assert_eq!(error.to_string(), "reading app/pom.xml failed while loading descriptor");
    }

    #[test]
    fn test_with_file_context() {
        let result: std::io::Result<()> = Err(Error::new(ErrorKind::PermissionDenied, "denied"));
        let error = result
            .with_file_context(FileOperation::Write, "/srv/pom.xml", "writing patched descriptor")
            .unwrap_err();

        assert_eq!(error.operation, FileOperation::Write);
        assert_eq!(error.purpose, "writing patched descriptor");
        assert!(error.user_message().contains("Permission denied for /srv/pom.xml"));
    }

    #[test]
    fn test_read_with_context() {
        let temp_dir = tempfile::tempdir().unwrap();
        let pom = temp_dir.path().join("pom.xml");
        std::fs::write(&pom, "<project/>").unwrap();
        assert_eq!(FileOps::read_with_context(&pom, "loading descriptor").unwrap(), b"<project/>");

        let missing = temp_dir.path().join("missing.xml");
        let error = FileOps::read_with_context(&missing, "loading descriptor").unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.operation, FileOperation::Read);
    }
}
