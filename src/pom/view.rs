//! Structured, read-only view over a descriptor [`Document`].
//!
//! Extraction never substitutes placeholders: versions are kept exactly as written
//! and resolved later against the merged property table. Every dependency and
//! property remembers the [`NodePath`] of the element it came from so that a later
//! decision can be patched back into the same node.

use super::coordinate::IdentityKey;
use super::properties::PropertyTable;
use crate::xml::{Document, Element, NodePath};
use tracing::debug;

/// Conventional location of a parent descriptor relative to the child's directory.
pub const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

/// How the parent descriptor may be found on the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativePath {
    /// No `<relativePath>` element: look at `../pom.xml`
    Default,
    /// An explicit path, relative to the child's directory
    Explicit(String),
    /// `<relativePath/>` (empty): skip the filesystem lookup
    Disabled,
}

impl RelativePath {
    /// The path to try, if filesystem lookup is enabled.
    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Default => Some(DEFAULT_RELATIVE_PATH),
            Self::Explicit(path) => Some(path),
            Self::Disabled => None,
        }
    }
}

/// The `<parent>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: RelativePath,
}

impl ParentRef {
    /// `groupId:artifactId:version`
    #[must_use]
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A `<properties>` child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub value: String,
    pub path: NodePath,
}

/// A `<dependency>` element as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Raw `<version>` text, placeholders intact; `None` when absent or empty
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub packaging: Option<String>,
    pub scope: Option<String>,
    /// Path of the `<dependency>` element
    pub path: NodePath,
    /// Path of its `<version>` child, if present
    pub version_path: Option<NodePath>,
}

impl DeclaredDependency {
    /// The identity of this declaration.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.classifier.clone(),
            self.packaging.clone(),
        )
    }

    /// Whether this entry imports a BOM (`<type>pom</type><scope>import</scope>`).
    #[must_use]
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.packaging.as_deref() == Some("pom")
    }
}

/// Everything the pipeline needs to know about one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomView {
    /// Own groupId, or the parent's when not declared
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    /// Own version, or the parent's when not declared
    pub version: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: Vec<PropertyDecl>,
    pub dependencies: Vec<DeclaredDependency>,
    pub dependency_management: Vec<DeclaredDependency>,
    pub modules: Vec<String>,
    /// Path of the direct `<dependencies>` container
    pub dependencies_path: Option<NodePath>,
}

impl PomView {
    /// Declared `<properties>` as a table.
    #[must_use]
    pub fn declared_properties(&self) -> PropertyTable {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// `project.*` properties derived from the descriptor's own coordinates.
    #[must_use]
    pub fn implicit_properties(&self) -> PropertyTable {
        let mut table = PropertyTable::new();
        let mut set = |name: &str, value: Option<&String>| {
            if let Some(value) = value {
                table.insert(name, value.clone());
            }
        };
        set("project.groupId", self.group_id.as_ref());
        set("project.artifactId", self.artifact_id.as_ref());
        set("project.version", self.version.as_ref());
        set("project.parent.groupId", self.parent.as_ref().map(|p| &p.group_id));
        set("project.parent.version", self.parent.as_ref().map(|p| &p.version));
        table
    }

    /// A declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// `groupId:artifactId`, when both are known.
    #[must_use]
    pub fn group_artifact(&self) -> Option<(&str, &str)> {
        Some((self.group_id.as_deref()?, self.artifact_id.as_deref()?))
    }
}

/// Build the structured view of `document`.
#[must_use]
pub fn extract(document: &Document) -> PomView {
    let root = document.root();
    let root_path = NodePath::root();

    let parent = root.child("parent").and_then(|(_, element)| parent_ref(element));
    let own = |name: &str| root.child_text(name).filter(|v| !v.is_empty());

    let mut view = PomView {
        group_id: own("groupId").or_else(|| parent.as_ref().map(|p| p.group_id.clone())),
        artifact_id: own("artifactId"),
        version: own("version").or_else(|| parent.as_ref().map(|p| p.version.clone())),
        parent,
        ..PomView::default()
    };

    if let Some((index, properties)) = root.child("properties") {
        let base = root_path.child(index);
        view.properties = properties
            .child_elements()
            .map(|(i, element)| PropertyDecl {
                name: element.name().to_string(),
                value: element.text(),
                path: base.child(i),
            })
            .collect();
    }

    if let Some((index, container)) = root.child("dependencies") {
        let path = root_path.child(index);
        view.dependencies = dependencies_in(container, &path);
        view.dependencies_path = Some(path);
    }

    if let Some((index, management)) = root.child("dependencyManagement")
        && let Some((inner, container)) = management.child("dependencies")
    {
        let path = root_path.child(index).child(inner);
        view.dependency_management = dependencies_in(container, &path);
    }

    if let Some((_, modules)) = root.child("modules") {
        view.modules = modules
            .child_elements()
            .filter(|(_, e)| e.name() == "module")
            .map(|(_, e)| e.text())
            .collect();
    }

    debug!(
        "Extracted view: {} properties, {} dependencies, {} managed",
        view.properties.len(),
        view.dependencies.len(),
        view.dependency_management.len()
    );
    view
}

fn parent_ref(element: &Element) -> Option<ParentRef> {
    let relative_path = match element.child("relativePath") {
        None => RelativePath::Default,
        Some((_, rp)) if rp.text().is_empty() => RelativePath::Disabled,
        Some((_, rp)) => RelativePath::Explicit(rp.text()),
    };
    Some(ParentRef {
        group_id: element.child_text("groupId")?,
        artifact_id: element.child_text("artifactId")?,
        version: element.child_text("version")?,
        relative_path,
    })
}

fn dependencies_in(container: &Element, path: &NodePath) -> Vec<DeclaredDependency> {
    container
        .child_elements()
        .filter(|(_, e)| e.name() == "dependency")
        .filter_map(|(index, element)| {
            let dependency = declared_dependency(element, path.child(index));
            if dependency.is_none() {
                debug!("Skipping dependency at {} without groupId/artifactId", path.child(index));
            }
            dependency
        })
        .collect()
}

fn declared_dependency(element: &Element, path: NodePath) -> Option<DeclaredDependency> {
    let text = |name: &str| element.child_text(name).filter(|v| !v.is_empty());
    let group_id = text("groupId")?;
    let artifact_id = text("artifactId")?;
    let version_path = element.child("version").map(|(i, _)| path.child(i));

    Some(DeclaredDependency {
        group_id,
        artifact_id,
        version: text("version"),
        classifier: text("classifier"),
        packaging: text("type"),
        scope: text("scope"),
        path,
        version_path,
    })
}
