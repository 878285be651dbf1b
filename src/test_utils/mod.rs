//! Test utilities for pomup
//!
//! Helpers for unit and integration tests: one-time logging setup and
//! [`PomFixture`], a temporary project tree with a local repository.
//!
//! # Example
//!
//! ```rust,no_run
//! use pomup_cli::test_utils::PomFixture;
//!
//! let fixture = PomFixture::new().unwrap();
//! let pom = fixture.write_pom("app/pom.xml", "<project/>").unwrap();
//! assert!(pom.exists());
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::OperationContext;
use crate::resolver::repository_path;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `None`, `RUST_LOG` is used when set and
/// logging stays off otherwise.
///
/// ```bash
/// RUST_LOG=pomup_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary project directory with a local repository under `repository/`.
pub struct PomFixture {
    temp_dir: TempDir,
}

impl PomFixture {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp directory")?;
        std::fs::create_dir_all(temp_dir.path().join("repository"))
            .context("Failed to create repository directory")?;
        Ok(Self {
            temp_dir,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The local repository root.
    #[must_use]
    pub fn repository(&self) -> PathBuf {
        self.root().join("repository")
    }

    /// Default context with the fixture repository as the only lookup root.
    #[must_use]
    pub fn context(&self) -> OperationContext {
        OperationContext::new().with_lookup_root(self.repository())
    }

    /// Write a descriptor at `relative` below the fixture root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_pom(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Install a descriptor in the fixture repository under its coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn install_pom(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        content: &str,
    ) -> Result<PathBuf> {
        let path = repository_path(&self.repository(), group_id, artifact_id, version);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Read a file below the fixture root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.root().join(relative);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Minimal descriptor text.
///
/// `parent` is `(groupId, artifactId, version)`; `body` is inserted verbatim after
/// the project's own coordinates, indented by the caller.
#[must_use]
pub fn pom_xml(
    group_id: &str,
    artifact_id: &str,
    version: &str,
    parent: Option<(&str, &str, &str)>,
    body: &str,
) -> String {
    let mut text = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n    <modelVersion>4.0.0</modelVersion>\n",
    );
    if let Some((g, a, v)) = parent {
        text.push_str(&format!(
            "    <parent>\n        <groupId>{g}</groupId>\n        <artifactId>{a}</artifactId>\n        <version>{v}</version>\n    </parent>\n"
        ));
    }
    text.push_str(&format!(
        "    <groupId>{group_id}</groupId>\n    <artifactId>{artifact_id}</artifactId>\n    <version>{version}</version>\n"
    ));
    text.push_str(body);
    text.push_str("</project>\n");
    text
}
