//! Parent-chain resolution and the effective model.
//!
//! A descriptor's ancestors are found the way Maven finds them when building
//! offline: first through the filesystem-relative `<relativePath>` (default
//! `../pom.xml`), then in each configured local repository root. The chain is an
//! explicit finite list of [`AncestorLink`]s; resolution stops at the first link
//! that cannot be resolved, because of a missing or unparsable file, a cycle, or
//! the configured depth bound. Stopping early is not an error: the effective model
//! is built from whatever was resolved, and a warning records where the chain ended.
//!
//! # Lookup order
//!
//! For a `<parent>` of `g:a:v` declared in `/work/app/pom.xml`:
//!
//! 1. `/work/app/<relativePath>` (a directory gets `pom.xml` appended), accepted only
//!    if that file declares `g:a`
//! 2. `<root>/g/as/path/a/v/a-v.pom` for each lookup root, in order
//!
//! An explicitly empty `<relativePath/>` skips step 1.

mod effective;


pub use effective::{EffectiveModel, ManagedEntry, ManagedOrigin};

use crate::core::file_error::{FileOps, FileOperationError};
use crate::core::{OperationContext, PomError};
use crate::pom::{ParentRef, PomView, extract};
use crate::xml::Document;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// One parsed descriptor together with its structured view.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub path: PathBuf,
    pub document: Document,
    pub view: PomView,
}

impl Descriptor {
    /// Read and parse the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// [`PomError::DescriptorNotFound`] when the file does not exist, a file system
    /// error for other I/O failures, or a parse error for malformed content.
    pub fn load(path: &Path) -> Result<Self, PomError> {
        let bytes = FileOps::read_with_context(path, "loading descriptor")
            .map_err(|e| io_to_pom_error(&e, path))?;
        let label = path.display().to_string();
        let document = Document::parse_bytes(&bytes, &label)?;
        Ok(Self::from_document(path.to_path_buf(), document))
    }

    /// Parse descriptor text that claims to live at `path`.
    ///
    /// # Errors
    ///
    /// A parse error for malformed content.
    pub fn from_source(source: &str, path: impl Into<PathBuf>) -> Result<Self, PomError> {
        let path = path.into();
        let document = Document::parse(source, &path.display().to_string())?;
        Ok(Self::from_document(path, document))
    }

    fn from_document(path: PathBuf, document: Document) -> Self {
        let view = extract(&document);
        Self {
            path,
            document,
            view,
        }
    }

    /// `groupId:artifactId:version` of this descriptor, with `?` for unknown parts.
    #[must_use]
    pub fn gav(&self) -> String {
        let part = |value: &Option<String>| value.clone().unwrap_or_else(|| "?".to_string());
        format!(
            "{}:{}:{}",
            part(&self.view.group_id),
            part(&self.view.artifact_id),
            part(&self.view.version)
        )
    }
}

fn io_to_pom_error(error: &FileOperationError, path: &Path) -> PomError {
    if error.is_not_found() {
        return PomError::DescriptorNotFound {
            path: path.display().to_string(),
        };
    }
    if error.source.kind() == std::io::ErrorKind::PermissionDenied {
        return PomError::PermissionDenied {
            operation: "read descriptor".to_string(),
            path: path.display().to_string(),
        };
    }
    PomError::FileSystemError {
        operation: error.to_string(),
        path: path.display().to_string(),
    }
}

/// Why a link in the chain could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No candidate file exists
    NotFound,
    /// A candidate was found but is not well-formed
    ParseFailed(String),
    /// The candidate is already part of the chain
    Cycle(PathBuf),
    /// The chain already holds the maximum number of ancestors
    DepthExceeded(usize),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found in the filesystem or any lookup root"),
            Self::ParseFailed(reason) => write!(f, "failed to parse: {reason}"),
            Self::Cycle(path) => write!(f, "inheritance cycle through {}", path.display()),
            Self::DepthExceeded(depth) => write!(f, "maximum inheritance depth {depth} exceeded"),
        }
    }
}

/// One step up the parent chain.
#[derive(Debug, Clone)]
pub enum AncestorLink {
    Resolved(Descriptor),
    Unresolved {
        parent: ParentRef,
        reason: UnresolvedReason,
    },
}

/// The ordered chain of ancestors, nearest first. At most the last link is
/// [`AncestorLink::Unresolved`].
#[derive(Debug, Clone, Default)]
pub struct Lineage {
    links: Vec<AncestorLink>,
}

impl Lineage {
    /// All links, nearest ancestor first.
    #[must_use]
    pub fn links(&self) -> &[AncestorLink] {
        &self.links
    }

    /// Successfully resolved ancestors, nearest first.
    pub fn resolved(&self) -> impl Iterator<Item = &Descriptor> {
        self.links.iter().filter_map(|link| match link {
            AncestorLink::Resolved(descriptor) => Some(descriptor),
            AncestorLink::Unresolved { .. } => None,
        })
    }

    /// The link that ended the chain early, if any.
    #[must_use]
    pub fn unresolved(&self) -> Option<(&ParentRef, &UnresolvedReason)> {
        self.links.iter().find_map(|link| match link {
            AncestorLink::Unresolved { parent, reason } => Some((parent, reason)),
            AncestorLink::Resolved(_) => None,
        })
    }

    /// Whether every declared ancestor was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved().is_none()
    }
}

/// Locates ancestors and imported BOMs according to an [`OperationContext`].
#[derive(Debug, Clone, Copy)]
pub struct InheritanceResolver<'a> {
    context: &'a OperationContext,
}

impl<'a> InheritanceResolver<'a> {
    #[must_use]
    pub const fn new(context: &'a OperationContext) -> Self {
        Self {
            context,
        }
    }

    /// The context this resolver reads its settings from.
    #[must_use]
    pub const fn context(&self) -> &'a OperationContext {
        self.context
    }

    /// Walk the parent chain of `descriptor`.
    #[must_use]
    pub fn lineage(&self, descriptor: &Descriptor) -> Lineage {
        let mut visited = HashSet::new();
        visited.insert(identity_path(&descriptor.path));

        let mut links = Vec::new();
        let mut current = descriptor.clone();

        while let Some(parent) = current.view.parent.clone() {
            if links.len() >= self.context.max_inheritance_depth {
                warn!(
                    "Stopping inheritance walk at {}: depth limit {} reached",
                    parent.gav(),
                    self.context.max_inheritance_depth
                );
                links.push(AncestorLink::Unresolved {
                    parent,
                    reason: UnresolvedReason::DepthExceeded(self.context.max_inheritance_depth),
                });
                break;
            }

            match self.locate_parent(&current, &parent) {
                Ok(found) => {
                    let key = identity_path(&found.path);
                    if !visited.insert(key.clone()) {
                        warn!("Inheritance cycle detected at {}", found.path.display());
                        links.push(AncestorLink::Unresolved {
                            parent,
                            reason: UnresolvedReason::Cycle(key),
                        });
                        break;
                    }
                    debug!("Resolved parent {} at {}", parent.gav(), found.path.display());
                    links.push(AncestorLink::Resolved(found.clone()));
                    current = found;
                }
                Err(reason) => {
                    warn!("Could not resolve parent {}: {}", parent.gav(), reason);
                    links.push(AncestorLink::Unresolved {
                        parent,
                        reason,
                    });
                    break;
                }
            }
        }

        Lineage {
            links,
        }
    }

    /// Find the descriptor named by `parent`, declared in `child`.
    ///
    /// # Errors
    ///
    /// The reason no acceptable candidate was found.
    pub fn locate_parent(
        &self,
        child: &Descriptor,
        parent: &ParentRef,
    ) -> Result<Descriptor, UnresolvedReason> {
        let mut parse_failure = None;

        if let Some(relative) = parent.relative_path.as_path() {
            let base = child.path.parent().unwrap_or_else(|| Path::new("."));
            let mut candidate = base.join(relative);
            if candidate.is_dir() {
                candidate = candidate.join("pom.xml");
            }
            trace!("Trying relative parent path {}", candidate.display());

            if candidate.is_file() {
                match Descriptor::load(&candidate) {
                    Ok(found) if declares(&found.view, &parent.group_id, &parent.artifact_id) => {
                        return Ok(found);
                    }
                    Ok(found) => debug!(
                        "Skipping {}: declares {} instead of {}:{}",
                        candidate.display(),
                        found.gav(),
                        parent.group_id,
                        parent.artifact_id
                    ),
                    Err(e) => parse_failure = Some(e.to_string()),
                }
            }
        }

        match self.locate_in_roots(&parent.group_id, &parent.artifact_id, &parent.version) {
            Err(UnresolvedReason::NotFound) => {
                Err(parse_failure.map_or(UnresolvedReason::NotFound, UnresolvedReason::ParseFailed))
            }
            other => other,
        }
    }

    /// Find `g:a:v` in the configured lookup roots.
    ///
    /// # Errors
    ///
    /// [`UnresolvedReason::NotFound`] when no root holds the descriptor, or
    /// [`UnresolvedReason::ParseFailed`] for the first candidate that does not parse.
    pub fn locate_in_roots(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<Descriptor, UnresolvedReason> {
        for root in &self.context.parent_lookup_roots {
            let candidate = repository_path(root, group_id, artifact_id, version);
            trace!("Trying repository path {}", candidate.display());
            if !candidate.is_file() {
                continue;
            }
            return Descriptor::load(&candidate)
                .map_err(|e| UnresolvedReason::ParseFailed(e.to_string()));
        }
        Err(UnresolvedReason::NotFound)
    }

    /// Build the effective model of `descriptor` from its lineage and imports.
    #[must_use]
    pub fn resolve(&self, descriptor: &Descriptor) -> EffectiveModel {
        effective::build(self, descriptor)
    }
}

/// `<root>/<group/as/path>/<artifactId>/<version>/<artifactId>-<version>.pom`
#[must_use]
pub fn repository_path(root: &Path, group_id: &str, artifact_id: &str, version: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in group_id.split('.') {
        path.push(part);
    }
    path.push(artifact_id);
    path.push(version);
    path.push(format!("{artifact_id}-{version}.pom"));
    path
}

fn declares(view: &PomView, group_id: &str, artifact_id: &str) -> bool {
    view.group_artifact() == Some((group_id, artifact_id))
}

fn identity_path(path: &Path) -> PathBuf {
    FileOps::canonicalize_with_context(path, "detecting inheritance cycles")
        .unwrap_or_else(|_| path.to_path_buf())
}
