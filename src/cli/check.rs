//! `pomup check`: fail when the descriptor does not satisfy the request.

use super::CliConfig;
use super::common::{RequestArgs, change_summary, print_report};
use crate::core::PomError;
use anyhow::Result;
use clap::Args;

/// Report the changes `add` would make. Exits non-zero when any are pending.
#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub request: RequestArgs,
}

impl CheckCommand {
    /// # Errors
    ///
    /// Returns an error if loading fails, or [`PomError::PendingChanges`] when the
    /// descriptor needs changes.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let output = self.request.run(config)?;
        print_report(&output, self.request.json)?;

        if output.has_changes() {
            return Err(PomError::PendingChanges {
                path: output.path.display().to_string(),
                summary: change_summary(&output),
            }
            .into());
        }
        Ok(())
    }
}
