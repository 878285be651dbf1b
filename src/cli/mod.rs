//! Command-line interface for pomup.
//!
//! The CLI is a thin caller of the [`operation`](crate::operation) API: it parses
//! arguments, layers flags over the configuration file, runs load, request and
//! modify, then prints the change report.
//!
//! # Commands
//!
//! - `add` - apply the requested coordinates, optionally writing the descriptor back
//! - `check` - report what `add` would do and fail when the descriptor needs changes
//!
//! # Global Options
//!
//! - `--verbose` - enable debug logging
//! - `--quiet` - disable logging
//! - `--config` - path to a configuration file (see [`crate::config`])
//!
//! # Example
//!
//! ```bash
//! # Raise jackson-databind and add commons-text if missing
//! pomup add --pom service/pom.xml \
//!     com.fasterxml.jackson.core:jackson-databind:2.17.1 \
//!     org.apache.commons:commons-text:1.12.0 --write
//!
//! # Fail a CI step when the descriptor is not remediated yet
//! pomup check com.fasterxml.jackson.core:jackson-databind:2.17.1
//! ```
//!
//! Logging goes to stderr so that `--json` output on stdout stays machine-readable.

mod add;
mod check;
pub mod common;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can check flag handling without touching
/// process-wide logging state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive for the log subscriber.
    ///
    /// `None` disables logging entirely. Otherwise the value is used as an
    /// [`EnvFilter`] directive, e.g. `"debug"` or `"pomup_cli=trace"`.
    pub log_level: Option<String>,

    /// Explicit configuration file path from `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// Does nothing when logging is disabled or a subscriber is already installed.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "pomup",
    about = "Format-preserving dependency editor for Maven pom.xml files",
    version,
    long_about = "pomup upgrades or inserts dependencies in a pom.xml while leaving every other byte untouched. \
                  Versions already covered by the descriptor, its parents or dependencyManagement are left alone."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file (overrides POMUP_CONFIG)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upgrade or insert dependencies in a descriptor
    Add(add::AddCommand),

    /// Report the changes `add` would make and fail if there are any
    Check(check::CheckCommand),
}

impl Cli {
    /// Run the selected command with configuration derived from the global flags.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `check` also fails when changes are pending.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&config)
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, and otherwise
    /// `RUST_LOG` is honored with `warn` as the fallback.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some(
                std::env::var("RUST_LOG")
                    .ok()
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| "warn".to_string()),
            )
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::Add(cmd) => cmd.execute(config),
            Commands::Check(cmd) => cmd.execute(config),
        }
    }
}
