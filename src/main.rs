//! pomup CLI entry point
//!
//! Parses arguments, runs the command and renders errors with suggestions.
//!
//! - `add` - upgrade or insert dependencies in a pom.xml
//! - `check` - fail when a pom.xml does not satisfy the requested dependencies

use clap::Parser;
use pomup_cli::cli;
use pomup_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
