//! Arguments and helpers shared by the `add` and `check` commands.

use super::CliConfig;
use crate::config::PomupConfig;
use crate::core::OperationContext;
use crate::operation::{self, ModifiedOutput, Outcome, Reason};
use crate::pom::Coordinate;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

/// Descriptor location, requested coordinates and per-run overrides.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Descriptor to modify
    #[arg(long, value_name = "PATH", default_value = "pom.xml")]
    pub pom: PathBuf,

    /// Requested dependencies as groupId:artifactId[:type[:classifier]]:version[@scope]
    #[arg(value_name = "COORDINATE", required = true)]
    pub coordinates: Vec<Coordinate>,

    /// Print the change report as JSON
    #[arg(long)]
    pub json: bool,

    /// Replace existing versions even when the requested one is lower
    #[arg(long)]
    pub overwrite_on_downgrade: bool,

    /// Ignore dependencyManagement coverage when deciding
    #[arg(long)]
    pub no_dependency_management: bool,

    /// Maximum number of ancestors to follow
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Local repository root for parent and BOM lookup (repeatable, replaces configured roots)
    #[arg(long = "lookup-root", value_name = "DIR")]
    pub lookup_roots: Vec<PathBuf>,
}

impl RequestArgs {
    /// Build the operation context: configuration file first, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn operation_context(&self, config: &CliConfig) -> Result<OperationContext> {
        let file = PomupConfig::load_with_optional(config.config_path.clone())?;
        let mut context = file.to_operation_context()?;
        self.apply_overrides(&mut context);
        Ok(context)
    }

    /// Layer the command-line flags over `context`.
    pub fn apply_overrides(&self, context: &mut OperationContext) {
        if self.overwrite_on_downgrade {
            context.overwrite_on_downgrade = true;
        }
        if self.no_dependency_management {
            context.prefer_dependency_management = false;
        }
        if let Some(depth) = self.max_depth {
            context.max_inheritance_depth = depth;
        }
        if !self.lookup_roots.is_empty() {
            context.parent_lookup_roots = self.lookup_roots.clone();
        }
    }

    /// Load the descriptor and run the request against it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or descriptor cannot be loaded, or if
    /// patching fails.
    pub fn run(&self, config: &CliConfig) -> Result<ModifiedOutput> {
        let context = self.operation_context(config)?;
        debug!("Operation context: {:?}", context);

        let loaded = operation::load(&self.pom, &context)
            .with_context(|| format!("Failed to load {}", self.pom.display()))?;
        let project = loaded.builder().with_dependencies(self.coordinates.iter().cloned()).build();

        operation::modify(project)
            .with_context(|| format!("Failed to modify {}", self.pom.display()))
    }
}

/// Print the report to stdout, as JSON or as text.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn print_report(output: &ModifiedOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        print!("{}", render_report(output));
    }
    Ok(())
}

/// Human-readable report, one line per record, warning and rejection.
#[must_use]
pub fn render_report(output: &ModifiedOutput) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", output.path.display().to_string().bold());

    for change in &output.changes {
        let symbol = match (&change.outcome, change.reason) {
            (Outcome::Upgraded { .. }, Reason::ForcedVersionReplacement) => "!".yellow(),
            (Outcome::Upgraded { .. }, _) => "↑".green(),
            (Outcome::Inserted, _) => "+".green(),
            (Outcome::Unchanged, _) => "=".dimmed(),
        };
        let _ = writeln!(text, "  {symbol} {change}");
        for note in &change.notes {
            let _ = writeln!(text, "      {note}");
        }
    }

    for warning in &output.warnings {
        let _ = writeln!(text, "  {} {warning}", "⚠".yellow());
    }

    for rejected in &output.rejected {
        let _ = writeln!(
            text,
            "  {} rejected {}: {}",
            "✗".red(),
            rejected.coordinate,
            rejected.reason
        );
    }

    if output.changes.is_empty() && output.rejected.is_empty() {
        let _ = writeln!(text, "  nothing requested");
    }
    text
}

/// One-line summary of how many records changed the descriptor.
#[must_use]
pub fn change_summary(output: &ModifiedOutput) -> String {
    let count = output.changes.iter().filter(|c| c.outcome.is_change()).count();
    match count {
        0 => "no changes needed".to_string(),
        1 => "1 change".to_string(),
        n => format!("{n} changes"),
    }
}
