//! User configuration for pomup.
//!
//! The configuration file is optional TOML with kebab-case keys. Every key maps onto
//! one [`OperationContext`] field; absent keys keep the engine defaults.
//!
//! ```toml
//! prefer-dependency-management = true
//! lookup-roots = ["~/.m2/repository", "$CI_CACHE/maven"]
//! max-inheritance-depth = 10
//! overwrite-on-downgrade = false
//! honor-explicit-versions = true
//! insert-managed-dependencies = false
//! update-properties = true
//! ```
//!
//! # Location
//!
//! The first of these that applies is used:
//!
//! 1. an explicit path (the CLI's `--config`)
//! 2. the `POMUP_CONFIG` environment variable
//! 3. `~/.pomup/config.toml` (`%LOCALAPPDATA%\pomup\config.toml` on Windows)
//!
//! An explicit or environment path must exist; a missing default file means
//! "all defaults".

use super::parse_config;
use crate::core::{OperationContext, PomError};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "POMUP_CONFIG";

/// Deserialized configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PomupConfig {
    /// Consult `dependencyManagement` before direct dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_dependency_management: Option<bool>,
    /// Local repository roots; `~` and `$VAR` are expanded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lookup_roots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inheritance_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite_on_downgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_explicit_versions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_managed_dependencies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_properties: Option<bool>,
}

impl PomupConfig {
    /// Load from an explicit path, then `POMUP_CONFIG`, then the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or environment-named file is missing, or if
    /// the chosen file cannot be parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        if let Some(path) = path.or(env_path) {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
            return Self::load_from(&path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        parse_config(path)
    }

    /// Default configuration file location.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow!("Unable to determine local data directory"))?
                .join("pomup")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow!("Unable to determine home directory"))?
                .join(".pomup")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The conventional local Maven repository, `~/.m2/repository`.
    #[must_use]
    pub fn default_lookup_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    /// Build the operation context these settings describe.
    ///
    /// With no configured roots, the default local repository is used when it
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup root references an undefined environment
    /// variable.
    pub fn to_operation_context(&self) -> Result<OperationContext> {
        let defaults = OperationContext::default();

        let parent_lookup_roots = if self.lookup_roots.is_empty() {
            Self::default_lookup_root().filter(|root| root.is_dir()).into_iter().collect()
        } else {
            self.lookup_roots
                .iter()
                .map(|root| expand_root(root))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(OperationContext {
            prefer_dependency_management: self
                .prefer_dependency_management
                .unwrap_or(defaults.prefer_dependency_management),
            parent_lookup_roots,
            max_inheritance_depth: self
                .max_inheritance_depth
                .unwrap_or(defaults.max_inheritance_depth),
            overwrite_on_downgrade: self
                .overwrite_on_downgrade
                .unwrap_or(defaults.overwrite_on_downgrade),
            honor_explicit_versions: self
                .honor_explicit_versions
                .unwrap_or(defaults.honor_explicit_versions),
            insert_managed_dependencies: self
                .insert_managed_dependencies
                .unwrap_or(defaults.insert_managed_dependencies),
            update_properties: self.update_properties.unwrap_or(defaults.update_properties),
        })
    }
}

/// Expand `~` and `$VAR` in a lookup root.
///
/// # Errors
///
/// Returns an error naming the root when a referenced variable is undefined.
pub fn expand_root(root: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(root).map_err(|e| PomError::ConfigError {
        message: format!("cannot expand lookup root '{root}': {e}"),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
