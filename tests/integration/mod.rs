//! Integration test suite for pomup
//!
//! End-to-end tests of the operation API and the `pomup` binary against
//! descriptors written to temporary directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `pomup add` / `pomup check` through the compiled binary
//! - **inheritance**: parent chains, repository lookup, BOM imports and cycles
//! - **pipeline**: idempotence, no-op fidelity, upgrade paths and insertion layout
//! - **concurrency**: independent descriptors processed on separate threads

mod cli;
mod concurrency;
mod inheritance;
mod pipeline;
