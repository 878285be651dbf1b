//! Dependency coordinates and identity keys.

use crate::core::PomError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Packaging type assumed when a dependency declares no `<type>`.
pub const DEFAULT_TYPE: &str = "jar";

/// A dependency the caller wants present in the descriptor.
///
/// The version is tracked separately from the [`IdentityKey`]: two coordinates
/// name the same dependency iff their identity keys match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// `<groupId>`
    pub group_id: String,
    /// `<artifactId>`
    pub artifact_id: String,
    /// `<version>`
    pub version: String,
    /// `<classifier>`, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// `<type>`, `jar` when absent
    #[serde(rename = "type", default = "default_type")]
    pub packaging: String,
    /// `<scope>`, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

/// groupId + artifactId + classifier + type; the version-independent identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityKey {
    /// `<groupId>`
    pub group_id: String,
    /// `<artifactId>`
    pub artifact_id: String,
    /// `<classifier>`, if any
    pub classifier: Option<String>,
    /// `<type>`
    #[serde(rename = "type")]
    pub packaging: String,
}

impl IdentityKey {
    /// Build a key, normalizing an empty classifier to `None` and an empty type
    /// to `jar`.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: Option<String>,
        packaging: Option<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: classifier.filter(|c| !c.is_empty()),
            packaging: packaging.filter(|t| !t.is_empty()).unwrap_or_else(default_type),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

impl Coordinate {
    /// A `jar` coordinate without classifier or scope.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            packaging: default_type(),
            scope: None,
        }
    }

    /// Set the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Set the packaging type.
    #[must_use]
    pub fn with_type(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    /// Set the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// The version-independent identity of this coordinate.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(
            self.group_id.trim(),
            self.artifact_id.trim(),
            self.classifier.as_ref().map(|c| c.trim().to_string()),
            Some(self.packaging.trim().to_string()),
        )
    }

    /// Check that the coordinate names a dependency that can be written.
    ///
    /// # Errors
    ///
    /// [`PomError::InvalidCoordinate`] when groupId, artifactId or version is blank.
    pub fn validate(&self) -> Result<(), PomError> {
        let missing = [
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("version", &self.version),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(PomError::InvalidCoordinate {
                coordinate: self.to_string(),
                reason: format!("missing {field}"),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if self.packaging != DEFAULT_TYPE || self.classifier.is_some() {
            write!(f, ":{}", self.packaging)?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for Coordinate {
    type Err = PomError;

    /// Parse `groupId:artifactId[:type[:classifier]]:version`, optionally followed by
    /// `@scope`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (spec, scope) = match s.rsplit_once('@') {
            Some((spec, scope)) => (spec, Some(scope.trim().to_string())),
            None => (s, None),
        };

        let parts: Vec<&str> = spec.trim().split(':').map(str::trim).collect();
        let coordinate = match parts.as_slice() {
            [group, artifact, version] => Coordinate::new(*group, *artifact, *version),
            [group, artifact, packaging, version] => {
                Coordinate::new(*group, *artifact, *version).with_type(*packaging)
            }
            [group, artifact, packaging, classifier, version] => {
                Coordinate::new(*group, *artifact, *version)
                    .with_type(*packaging)
                    .with_classifier(*classifier)
            }
            _ => {
                return Err(PomError::InvalidCoordinate {
                    coordinate: s.to_string(),
                    reason: "expected groupId:artifactId[:type[:classifier]]:version".to_string(),
                });
            }
        };

        let coordinate = Self {
            scope: scope.filter(|s| !s.is_empty()),
            ..coordinate
        };
        coordinate.validate()?;
        Ok(coordinate)
    }
}
