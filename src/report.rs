//! Change report types returned by an operation.
//!
//! Everything here serializes with `serde` so callers can emit the report as JSON.

use crate::pom::Coordinate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A non-fatal problem noticed while loading or classifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// An ancestor or imported BOM could not be resolved; the chain stops there.
    #[serde(rename_all = "camelCase")]
    AncestorResolution {
        /// `groupId:artifactId:version` of the missing ancestor
        ancestor: String,
        reason: String,
    },
    /// A version placeholder could not be expanded.
    #[serde(rename_all = "camelCase")]
    UnresolvablePlaceholder {
        /// Identity of the dependency the version belongs to
        dependency: String,
        placeholder: String,
        value: String,
    },
    /// An earlier request was dropped in favor of a later one with the same identity.
    #[serde(rename_all = "camelCase")]
    SupersededRequest {
        requested: String,
        superseded_by: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AncestorResolution { ancestor, reason } => {
                write!(f, "could not resolve ancestor {ancestor}: {reason}")
            }
            Self::UnresolvablePlaceholder {
                dependency,
                placeholder,
                value,
            } => write!(
                f,
                "version '{value}' of {dependency} references undefined property '{placeholder}'"
            ),
            Self::SupersededRequest {
                requested,
                superseded_by,
            } => write!(f, "request {requested} superseded by {superseded_by}"),
        }
    }
}

/// What happened to one requested coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Unchanged,
    Upgraded { from: String, to: String },
    Inserted,
}

impl Outcome {
    /// Whether the descriptor text was changed for this record.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Why an outcome was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    CoveredByDependencyManagement,
    AlreadySatisfied,
    UnresolvableVersion,
    SupersededByLaterRequest,
    NewerVersionRequested,
    ForcedVersionReplacement,
    NotDeclared,
    VersionManagedByDependencyManagement,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CoveredByDependencyManagement => "covered by dependency management",
            Self::AlreadySatisfied => "already satisfied",
            Self::UnresolvableVersion => "unresolvable version",
            Self::SupersededByLaterRequest => "superseded by a later request",
            Self::NewerVersionRequested => "newer version requested",
            Self::ForcedVersionReplacement => "forced version replacement",
            Self::NotDeclared => "not declared",
            Self::VersionManagedByDependencyManagement => {
                "version managed by dependency management"
            }
        };
        f.write_str(text)
    }
}

/// One record per requested coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub coordinate: Coordinate,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Warning>,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Unchanged => write!(f, "unchanged {} ({})", self.coordinate, self.reason),
            Outcome::Upgraded { from, to } => {
                let from = if from.is_empty() { "(none)" } else { from.as_str() };
                write!(
                    f,
                    "upgraded {}:{} {from} -> {to} ({})",
                    self.coordinate.group_id, self.coordinate.artifact_id, self.reason
                )
            }
            Outcome::Inserted => write!(f, "inserted {} ({})", self.coordinate, self.reason),
        }
    }
}

/// A request entry that failed validation and was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRequest {
    pub coordinate: Coordinate,
    pub reason: String,
}

/// Result of a completed operation. Nothing is written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedOutput {
    /// Descriptor the text belongs to
    pub path: PathBuf,
    /// Full descriptor text after patching
    #[serde(skip)]
    pub text: String,
    pub changes: Vec<ChangeRecord>,
    pub warnings: Vec<Warning>,
    pub rejected: Vec<RejectedRequest>,
}

impl ModifiedOutput {
    /// Whether any record changed the descriptor.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.outcome.is_change())
    }
}
