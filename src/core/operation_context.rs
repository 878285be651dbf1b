//! Operation-scoped configuration for the descriptor mutation pipeline.
//!
//! The [`OperationContext`] is built once per operation (by the CLI from flags and
//! the configuration file, or directly by a library caller) and passed by
//! reference through load → resolve → classify → patch. It is immutable: no stage
//! changes behavior through shared settings.
//!
//! # Example
//!
//! ```rust,no_run
//! use pomup_cli::core::OperationContext;
//! use std::path::PathBuf;
//!
//! let ctx = OperationContext::new()
//!     .with_lookup_root(PathBuf::from("/opt/maven/repository"))
//!     .with_overwrite_on_downgrade(true);
//!
//! assert!(ctx.prefer_dependency_management);
//! assert_eq!(ctx.max_inheritance_depth, 10);
//! ```

use std::path::PathBuf;

/// Default bound on how many ancestors are followed before resolution stops.
pub const DEFAULT_MAX_INHERITANCE_DEPTH: usize = 10;

/// Configuration for a single load/modify operation.
///
/// # Fields
///
/// - `prefer_dependency_management`: consult the effective `dependencyManagement`
///   table before direct dependencies; a managed version at or above the requested
///   one leaves the descriptor untouched.
/// - `parent_lookup_roots`: ordered local repository roots searched for parent
///   descriptors and imported BOMs after the filesystem-relative path.
/// - `max_inheritance_depth`: ancestors followed before resolution is truncated.
/// - `overwrite_on_downgrade`: replace an existing version even when the requested
///   one is lower.
/// - `honor_explicit_versions`: a direct dependency with its own `<version>` is
///   judged by that version even when `dependencyManagement` would cover the request.
///   Defaults to `true`. Set it to `false` for strict step order, where management
///   coverage is checked before the direct comparison for every request.
/// - `insert_managed_dependencies`: insert a version-less entry for a request that is
///   covered by `dependencyManagement` but not yet declared.
/// - `update_properties`: upgrade a `${prop}` version by editing the local property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// Whether managed versions are consulted before direct dependencies
    pub prefer_dependency_management: bool,
    /// Local repository roots, searched in order
    pub parent_lookup_roots: Vec<PathBuf>,
    /// Maximum number of ancestors followed
    pub max_inheritance_depth: usize,
    /// Whether a lower requested version still replaces the existing one
    pub overwrite_on_downgrade: bool,
    /// Whether an explicit `<version>` takes precedence over managed coverage;
    /// `false` keeps management coverage ahead of the direct comparison
    pub honor_explicit_versions: bool,
    /// Whether managed-but-undeclared requests are inserted without a version
    pub insert_managed_dependencies: bool,
    /// Whether placeholder versions are upgraded through their local property
    pub update_properties: bool,
}

impl Default for OperationContext {
    fn default() -> Self {
        Self {
            prefer_dependency_management: true,
            parent_lookup_roots: Vec::new(),
            max_inheritance_depth: DEFAULT_MAX_INHERITANCE_DEPTH,
            overwrite_on_downgrade: false,
            honor_explicit_versions: true,
            insert_managed_dependencies: false,
            update_properties: true,
        }
    }
}

impl OperationContext {
    /// Create a context with default settings and no repository roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a local repository root to the lookup order.
    #[must_use]
    pub fn with_lookup_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.parent_lookup_roots.push(root.into());
        self
    }

    /// Set whether `dependencyManagement` is consulted first.
    #[must_use]
    pub const fn with_prefer_dependency_management(mut self, prefer: bool) -> Self {
        self.prefer_dependency_management = prefer;
        self
    }

    /// Set the ancestor depth bound.
    #[must_use]
    pub const fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    /// Set whether lower requested versions replace existing ones.
    #[must_use]
    pub const fn with_overwrite_on_downgrade(mut self, overwrite: bool) -> Self {
        self.overwrite_on_downgrade = overwrite;
        self
    }

    /// Set whether explicit versions take precedence over managed coverage.
    #[must_use]
    pub const fn with_honor_explicit_versions(mut self, honor: bool) -> Self {
        self.honor_explicit_versions = honor;
        self
    }

    /// Set whether covered-but-undeclared requests are inserted without a version.
    #[must_use]
    pub const fn with_insert_managed_dependencies(mut self, insert: bool) -> Self {
        self.insert_managed_dependencies = insert;
        self
    }

    /// Set whether placeholder versions are upgraded through their property.
    #[must_use]
    pub const fn with_update_properties(mut self, update: bool) -> Self {
        self.update_properties = update;
        self
    }
}
