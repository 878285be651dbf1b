//! Generic TOML file parsing with path context in errors.

use anyhow::{Context, Result};
use std::path::Path;

/// Read `path` and deserialize it as TOML.
///
/// # Examples
///
/// ```rust,no_run
/// use pomup_cli::config::parse_config;
/// use pomup_cli::config::PomupConfig;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: PomupConfig = parse_config(Path::new("pomup.toml"))?;
/// println!("{} lookup roots", config.lookup_roots.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does not
/// match the shape of `T`. Both failures name the file.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
