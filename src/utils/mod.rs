//! Utility functions shared by the CLI.
//!
//! - `fs` - atomic file replacement

pub mod fs;

pub use fs::atomic_write;
