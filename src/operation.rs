//! The operation API: load a descriptor, request dependencies, compute the result.
//!
//! An operation owns everything it touches. Loading parses the descriptor and
//! resolves its ancestors once; [`modify`] classifies the request list against that
//! snapshot and patches the descriptor's own tree. Nothing is written to disk:
//! callers decide whether to persist [`ModifiedOutput::text`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pomup_cli::core::OperationContext;
//! use pomup_cli::operation::{load, modify};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let context = OperationContext::default();
//! let project = load(Path::new("pom.xml"), &context)?
//!     .with_dependency("org.slf4j:slf4j-api:2.0.9".parse()?)
//!     .build();
//! let output = modify(project)?;
//! for change in &output.changes {
//!     println!("{change}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::{OperationContext, PomError};
use crate::decision::plan;
use crate::patcher;
use crate::pom::Coordinate;
use crate::resolver::{Descriptor, EffectiveModel, InheritanceResolver};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use crate::report::{ChangeRecord, ModifiedOutput, Outcome, Reason, RejectedRequest, Warning};

/// A parsed descriptor together with its effective model.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    descriptor: Descriptor,
    model: EffectiveModel,
    context: OperationContext,
}

/// Load the descriptor at `path` and resolve its ancestors.
///
/// # Errors
///
/// A parse error for malformed XML, or a file error when the descriptor cannot be
/// read. Ancestor problems are warnings, not errors.
pub fn load(path: &Path, context: &OperationContext) -> Result<LoadedModel, PomError> {
    let descriptor = Descriptor::load(path)?;
    Ok(LoadedModel::new(descriptor, context))
}

/// Load descriptor text that lives (or will live) at `path`.
///
/// `path` anchors relative parent lookup.
///
/// # Errors
///
/// A parse error for malformed XML.
pub fn load_str(
    text: &str,
    path: impl Into<PathBuf>,
    context: &OperationContext,
) -> Result<LoadedModel, PomError> {
    let descriptor = Descriptor::from_source(text, path)?;
    Ok(LoadedModel::new(descriptor, context))
}

impl LoadedModel {
    fn new(descriptor: Descriptor, context: &OperationContext) -> Self {
        let model = InheritanceResolver::new(context).resolve(&descriptor);
        debug!(
            "Loaded {} ({} managed entries, {} warnings)",
            descriptor.path.display(),
            model.managed.len(),
            model.warnings.len()
        );
        Self {
            descriptor,
            model,
            context: context.clone(),
        }
    }

    /// Path of the loaded descriptor.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.descriptor.path
    }

    /// The merged view of the descriptor and its ancestors.
    #[must_use]
    pub const fn effective_model(&self) -> &EffectiveModel {
        &self.model
    }

    /// Start an empty request.
    #[must_use]
    pub fn builder(self) -> ProjectModelBuilder {
        ProjectModelBuilder {
            loaded: self,
            requests: Vec::new(),
        }
    }

    /// Start a request with one coordinate.
    #[must_use]
    pub fn with_dependency(self, coordinate: Coordinate) -> ProjectModelBuilder {
        self.builder().with_dependency(coordinate)
    }
}

/// Accumulates the dependency request.
#[derive(Debug, Clone)]
pub struct ProjectModelBuilder {
    loaded: LoadedModel,
    requests: Vec<Coordinate>,
}

impl ProjectModelBuilder {
    /// Append a coordinate; order decides insertion order.
    #[must_use]
    pub fn with_dependency(mut self, coordinate: Coordinate) -> Self {
        self.requests.push(coordinate);
        self
    }

    /// Append several coordinates.
    #[must_use]
    pub fn with_dependencies(mut self, coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        self.requests.extend(coordinates);
        self
    }

    /// Freeze the request.
    #[must_use]
    pub fn build(self) -> ProjectModel {
        ProjectModel {
            loaded: self.loaded,
            requests: self.requests,
        }
    }
}

/// A loaded descriptor plus a complete request, ready for [`modify`].
#[derive(Debug, Clone)]
pub struct ProjectModel {
    loaded: LoadedModel,
    requests: Vec<Coordinate>,
}

impl ProjectModel {
    /// The requested coordinates in order.
    #[must_use]
    pub fn requests(&self) -> &[Coordinate] {
        &self.requests
    }
}

/// Classify every request and patch the descriptor.
///
/// Invalid request entries are reported in [`ModifiedOutput::rejected`] and do not
/// stop the others.
///
/// # Errors
///
/// [`PomError::PatchTargetMissing`] if patching fails; no text is produced then.
pub fn modify(project: ProjectModel) -> Result<ModifiedOutput, PomError> {
    let ProjectModel {
        loaded,
        requests,
    } = project;
    let LoadedModel {
        descriptor,
        model,
        context,
    } = loaded;

    let mut rejected = Vec::new();
    let mut accepted = Vec::new();
    for request in requests {
        match request.validate() {
            Ok(()) => accepted.push(request),
            Err(e) => {
                warn!("Rejecting request {}: {}", request, e);
                let reason = match e {
                    PomError::InvalidCoordinate { reason, .. } => reason,
                    other => other.to_string(),
                };
                rejected.push(RejectedRequest {
                    coordinate: request,
                    reason,
                });
            }
        }
    }

    let decisions = plan(&model, &accepted, &context);
    let (document, changes) = patcher::apply(descriptor.document, &decisions)?;

    let mut warnings = model.warnings.clone();
    for note in changes.iter().flat_map(|c| &c.notes) {
        if !warnings.contains(note) {
            warnings.push(note.clone());
        }
    }

    let changed = changes.iter().filter(|c| c.outcome.is_change()).count();
    info!(
        "{}: {} of {} requests changed the descriptor",
        descriptor.path.display(),
        changed,
        changes.len()
    );

    Ok(ModifiedOutput {
        path: descriptor.path,
        text: document.serialize(),
        changes,
        warnings,
        rejected,
    })
}
