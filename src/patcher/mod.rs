//! In-place patching of the lossless document.
//!
//! The patcher only touches nodes named by a [`Decision`]: upgrades replace the
//! content of one text node (or add one `<version>` element), inserts add one
//! `<dependency>` element to the direct `<dependencies>` container, creating the
//! container when the descriptor has none. Upgrades run before inserts, so the
//! node paths recorded at extraction time are still valid when they are used.
//!
//! New markup copies the indentation of its nearest sibling, or its parent's
//! indentation plus one unit, and uses the document's own line ending. A new
//! `<dependency>` keeps its fields on one line when the last existing one does.
//! New elements carry the namespace prefix of the element they are added to.

pub mod style;

use crate::core::PomError;
use crate::decision::{Action, Decision, UpgradeTarget};
use crate::pom::{Coordinate, DEFAULT_TYPE};
use crate::report::{ChangeRecord, Outcome};
use crate::xml::{Document, Element, Node, NodePath};
use style::{Style, first_child_indent, last_child_indent};
use tracing::{debug, info};

/// Root children that conventionally precede `<dependencies>` in a descriptor.
const DEPENDENCIES_PREDECESSORS: &[&str] = &[
    "modelVersion",
    "parent",
    "groupId",
    "artifactId",
    "version",
    "packaging",
    "name",
    "description",
    "url",
    "inceptionYear",
    "organization",
    "licenses",
    "developers",
    "contributors",
    "mailingLists",
    "prerequisites",
    "modules",
    "scm",
    "issueManagement",
    "ciManagement",
    "distributionManagement",
    "properties",
    "dependencyManagement",
];

/// Apply `decisions` to `document` and report one record per decision.
///
/// # Errors
///
/// [`PomError::PatchTargetMissing`] when a node named by an upgrade no longer exists.
/// No partial document is returned in that case.
pub fn apply(
    mut document: Document,
    decisions: &[Decision],
) -> Result<(Document, Vec<ChangeRecord>), PomError> {
    let style = Style::infer(&document);

    for decision in decisions {
        if let Action::Upgrade { target, to, .. } = &decision.action {
            upgrade(&mut document, target, to, &style)?;
            info!("Upgraded {} to {}", decision.coordinate.identity_key(), to);
        }
    }

    for decision in decisions {
        if let Action::Insert {
            coordinate,
            with_version,
        } = &decision.action
        {
            insert(&mut document, coordinate, *with_version, &style)?;
            info!("Inserted {}", coordinate);
        }
    }

    let records = decisions.iter().map(record).collect();
    Ok((document, records))
}

fn record(decision: &Decision) -> ChangeRecord {
    let outcome = match &decision.action {
        Action::Unchanged => Outcome::Unchanged,
        Action::Upgrade { from, to, .. } => Outcome::Upgraded {
            from: from.clone(),
            to: to.clone(),
        },
        Action::Insert { .. } => Outcome::Inserted,
    };
    ChangeRecord {
        coordinate: decision.coordinate.clone(),
        outcome,
        reason: decision.reason,
        notes: decision.notes.clone(),
    }
}

fn missing(what: &str, path: &NodePath) -> PomError {
    PomError::PatchTargetMissing {
        target: format!("{what} at {path}"),
    }
}

fn upgrade(
    document: &mut Document,
    target: &UpgradeTarget,
    version: &str,
    style: &Style,
) -> Result<(), PomError> {
    match target {
        UpgradeTarget::VersionText { path }
        | UpgradeTarget::ManagedVersion { path }
        | UpgradeTarget::Property { path, .. } => {
            let element =
                document.element_mut(path).ok_or_else(|| missing("version text", path))?;
            debug!("Replacing <{}> text at {}", element.name(), path);
            element.set_text(version);
            Ok(())
        }
        UpgradeTarget::AddVersion { dependency } => {
            let indent = dependency_indent(document, dependency);
            let element = document
                .element_mut(dependency)
                .ok_or_else(|| missing("dependency", dependency))?;
            add_version(element, version, &indent, style);
            Ok(())
        }
    }
}

/// Indentation of the element at `path` within its parent, `""` when unknown.
fn dependency_indent(document: &Document, path: &NodePath) -> String {
    path.parent()
        .zip(path.last())
        .and_then(|(parent, index)| document.element(&parent)?.indent_before(index))
        .unwrap_or_default()
}

fn add_version(dependency: &mut Element, version: &str, indent: &str, style: &Style) {
    if let Some(existing) = dependency.child_mut("version") {
        existing.set_text(version);
        return;
    }

    let element = Node::Element(dependency.text_like("version", version));
    let anchor = dependency
        .child("artifactId")
        .or_else(|| dependency.child("groupId"))
        .map(|(index, _)| index);

    match anchor {
        Some(index) => match dependency.indent_before(index) {
            Some(field_indent) => {
                dependency.insert_child(index + 1, Node::Text(style.line(&field_indent)));
                dependency.insert_child(index + 2, element);
            }
            None => dependency.insert_child(index + 1, element),
        },
        None => append_child(dependency, element, &style.deeper(indent), indent, style),
    }
}

/// Append `node` as the last child of `parent`, before any trailing whitespace.
fn append_child(
    parent: &mut Element,
    node: Node,
    child_indent: &str,
    parent_indent: &str,
    style: &Style,
) {
    let trailing = parent.children().last().is_some_and(Node::is_whitespace);
    if trailing {
        let index = parent.children().len() - 1;
        parent.insert_child(index, Node::Text(style.line(child_indent)));
        parent.insert_child(index + 1, node);
    } else {
        parent.push_child(Node::Text(style.line(child_indent)));
        parent.push_child(node);
        parent.push_child(Node::Text(style.line(parent_indent)));
    }
}

fn insert(
    document: &mut Document,
    coordinate: &Coordinate,
    with_version: bool,
    style: &Style,
) -> Result<(), PomError> {
    let root_indent = root_child_indent(document, style);
    let container_path = match document.root().child("dependencies") {
        Some((index, _)) => NodePath::root().child(index),
        None => create_container(document, &root_indent, style),
    };

    let container = document
        .element(&container_path)
        .ok_or_else(|| missing("dependencies container", &container_path))?;
    let container_indent = document
        .root()
        .indent_before(container_path.last().unwrap_or_default())
        .unwrap_or_else(|| root_indent.clone());

    let sibling = container
        .child_elements()
        .filter(|(_, e)| e.name() == "dependency")
        .last();
    let dependency_indent =
        last_child_indent(container).unwrap_or_else(|| style.deeper(&container_indent));
    // `None` writes the fields inline, like a one-line sibling.
    let field_indent = match sibling {
        Some((_, e)) if e.child_elements().next().is_some() => first_child_indent(e),
        _ => Some(style.deeper(&dependency_indent)),
    };

    let element = dependency_element(
        container,
        coordinate,
        with_version,
        field_indent.as_deref(),
        &dependency_indent,
        style,
    );
    let container = document
        .element_mut(&container_path)
        .ok_or_else(|| missing("dependencies container", &container_path))?;
    append_child(
        container,
        Node::Element(element),
        &dependency_indent,
        &container_indent,
        style,
    );
    Ok(())
}

fn root_child_indent(document: &Document, style: &Style) -> String {
    first_child_indent(document.root()).unwrap_or_else(|| style.unit.clone())
}

/// Create `<dependencies>` after the last conventional predecessor and return its path.
fn create_container(document: &mut Document, indent: &str, style: &Style) -> NodePath {
    let root = document.root_mut();
    let anchor = root
        .child_elements()
        .filter(|(_, e)| DEPENDENCIES_PREDECESSORS.contains(&e.name()))
        .map(|(index, _)| index)
        .last();
    let container = Node::Element(root.new_like("dependencies"));

    let index = match anchor {
        Some(anchor) => {
            debug!("Creating <dependencies> after child {}", anchor);
            root.insert_child(anchor + 1, Node::Text(style.line(indent)));
            root.insert_child(anchor + 2, container);
            match root.children().get(anchor + 3) {
                Some(Node::Element(_)) => {
                    root.insert_child(anchor + 3, Node::Text(style.line(indent)));
                }
                Some(_) => {}
                None => root.push_child(Node::Text(style.line(""))),
            }
            anchor + 2
        }
        None => {
            debug!("Appending <dependencies> to the root element");
            append_child(root, container, indent, "", style);
            root.child_elements()
                .filter(|(_, e)| e.name() == "dependencies")
                .map(|(index, _)| index)
                .last()
                .unwrap_or_default()
        }
    };
    NodePath::root().child(index)
}

/// Build a `<dependency>` for `container`; `field_indent` of `None` keeps it on one line.
fn dependency_element(
    container: &Element,
    coordinate: &Coordinate,
    with_version: bool,
    field_indent: Option<&str>,
    indent: &str,
    style: &Style,
) -> Element {
    let mut fields = vec![
        ("groupId", coordinate.group_id.as_str()),
        ("artifactId", coordinate.artifact_id.as_str()),
    ];
    if with_version {
        fields.push(("version", coordinate.version.as_str()));
    }
    if coordinate.packaging != DEFAULT_TYPE {
        fields.push(("type", coordinate.packaging.as_str()));
    }
    if let Some(classifier) = &coordinate.classifier {
        fields.push(("classifier", classifier));
    }
    if let Some(scope) = &coordinate.scope {
        fields.push(("scope", scope));
    }

    let mut element = container.new_like("dependency");
    let mut children = Vec::with_capacity(fields.len() * 2 + 1);
    for (name, value) in fields {
        if let Some(field_indent) = field_indent {
            children.push(Node::Text(style.line(field_indent)));
        }
        children.push(Node::Element(element.text_like(name, value)));
    }
    if field_indent.is_some() {
        children.push(Node::Text(style.line(indent)));
    }

    element.replace_children(children);
    element
}
