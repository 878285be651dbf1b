//! pomup - format-preserving dependency editor for Maven descriptors
//!
//! pomup answers one question for a caller that already knows which dependency
//! coordinates a project needs: does this `pom.xml` need to change, and if so, what
//! is the smallest edit? Every byte outside the patched spans is preserved.
//!
//! # Architecture Overview
//!
//! A descriptor is held twice: as a lossless XML tree that re-emits its input
//! unchanged, and as a structured view extracted from that tree. The pipeline is
//!
//! 1. [`xml`] parses the text into a [`xml::Document`]
//! 2. [`pom`] extracts properties, dependencies, dependencyManagement, the parent
//!    reference and modules
//! 3. [`resolver`] follows the parent chain and BOM imports into an
//!    [`resolver::EffectiveModel`]
//! 4. [`decision`] classifies each requested coordinate as unchanged, upgrade or
//!    insert
//! 5. [`patcher`] applies those actions to the tree and re-serializes it
//!
//! [`operation`] wraps the pipeline in a `load` / `with_dependency` / `build` /
//! `modify` API and [`report`] holds the serializable change report.
//!
//! # Core Modules
//!
//! - [`core`] - error types and the immutable [`core::OperationContext`]
//! - [`version`] - Maven version ordering
//! - [`config`] - optional `pomup.toml` configuration
//! - [`cli`] - the `pomup` command-line front end
//! - [`utils`] - atomic file writes
//!
//! # Example
//!
//! ```rust,no_run
//! use pomup_cli::core::OperationContext;
//! use pomup_cli::operation;
//! use pomup_cli::pom::Coordinate;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let context = OperationContext::new().with_lookup_root("/home/dev/.m2/repository");
//! let project = operation::load(Path::new("pom.xml"), &context)?
//!     .with_dependency(Coordinate::new("org.yaml", "snakeyaml", "2.2"))
//!     .build();
//!
//! let output = operation::modify(project)?;
//! for change in &output.changes {
//!     println!("{change}");
//! }
//! if output.has_changes() {
//!     std::fs::write(&output.path, &output.text)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Operations share no state. Distinct descriptors may be processed on separate
//! threads; callers must serialize access to the same file.

pub mod cli;
pub mod config;
pub mod core;
pub mod decision;
pub mod operation;
pub mod patcher;
pub mod pom;
pub mod report;
pub mod resolver;
pub mod utils;
pub mod version;
pub mod xml;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
