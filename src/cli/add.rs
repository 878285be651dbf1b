//! `pomup add`: upgrade or insert dependencies.

use super::CliConfig;
use super::common::{RequestArgs, change_summary, print_report};
use crate::utils::atomic_write;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

/// Upgrade or insert the requested coordinates.
///
/// Without `--write` the descriptor is left untouched and only the report is
/// printed.
#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Write the modified descriptor back in place
    #[arg(short, long)]
    pub write: bool,
}

impl AddCommand {
    /// # Errors
    ///
    /// Returns an error if loading, patching or writing fails.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let output = self.request.run(config)?;
        print_report(&output, self.request.json)?;

        if !output.has_changes() {
            return Ok(());
        }

        if self.write {
            atomic_write(&output.path, output.text.as_bytes())?;
            info!("Wrote {}", output.path.display());
            if !self.request.json {
                println!(
                    "{} wrote {} ({})",
                    "✓".green(),
                    output.path.display(),
                    change_summary(&output)
                );
            }
        } else if !self.request.json {
            println!(
                "{} dry run, pass --write to apply ({})",
                "ℹ".blue(),
                change_summary(&output)
            );
        }
        Ok(())
    }
}
