//! Configuration management for pomup
//!
//! The engine itself only ever sees an immutable
//! [`OperationContext`](crate::core::OperationContext). This module produces one
//! from the optional user configuration file; the CLI then layers its flags on top.
//!
//! # Modules
//!
//! - `global` - [`PomupConfig`], its file location rules and root expansion
//! - `parser` - [`parse_config`], generic TOML parsing with file context
//!
//! # Precedence
//!
//! 1. CLI flags
//! 2. The configuration file (`--config`, then `POMUP_CONFIG`, then
//!    `~/.pomup/config.toml`)
//! 3. Engine defaults

mod global;
mod parser;

pub use global::{CONFIG_ENV_VAR, PomupConfig, expand_root};
pub use parser::parse_config;
