//! File system helpers.

use crate::core::file_error::{FileOperation, FileResultExt};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` so readers see either the old or the new file.
///
/// The bytes go to a temporary file in the same directory, are synced, and the
/// temporary file is renamed over `path`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the temporary file cannot
/// be written or synced, or the rename fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).with_file_context(
        FileOperation::Write,
        parent,
        "creating a temporary file",
    )?;
    temp.write_all(content).with_file_context(
        FileOperation::Write,
        temp.path().to_path_buf(),
        "writing patched descriptor",
    )?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path).map_err(|e| e.error).with_file_context(
        FileOperation::Write,
        path,
        "replacing descriptor",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pom.xml");
        fs::write(&path, "<project/>").unwrap();

        atomic_write(&path, b"<project></project>\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<project></project>\n");

        let leftovers = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("module").join("pom.xml");
        atomic_write(&path, b"<project/>").unwrap();
        assert!(path.exists());
    }
}
