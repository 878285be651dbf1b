//! The effective model: a descriptor merged with its resolved ancestors.

use super::{Descriptor, InheritanceResolver, UnresolvedReason};
use crate::pom::{DeclaredDependency, IdentityKey, PomView, PropertyTable};
use crate::report::Warning;
use crate::xml::NodePath;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where a managed version was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedOrigin {
    /// In the descriptor being modified; the paths locate the entry for patching
    Local {
        path: NodePath,
        version_path: Option<NodePath>,
    },
    /// In an ancestor (`groupId:artifactId:version`)
    Inherited { ancestor: String },
    /// In an imported BOM (`groupId:artifactId:version`)
    Imported { bom: String },
}

/// One entry of the merged `dependencyManagement` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedEntry {
    /// Raw version, placeholders intact (imported entries are pre-expanded)
    pub version: Option<String>,
    pub scope: Option<String>,
    pub origin: ManagedOrigin,
}

impl ManagedEntry {
    /// Whether the entry is declared in the chain rather than imported from a BOM.
    ///
    /// A declared entry beats anything a farther, unresolved ancestor could add.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        !matches!(self.origin, ManagedOrigin::Imported { .. })
    }
}

/// Read-only snapshot of a descriptor plus whatever ancestors were resolved.
#[derive(Debug, Clone)]
pub struct EffectiveModel {
    /// Path of the descriptor being modified
    pub path: PathBuf,
    /// Structured view of that descriptor
    pub view: PomView,
    /// Merged properties; nearer declarations win
    pub properties: PropertyTable,
    /// Merged `dependencyManagement`; declared entries beat imports, nearer beats farther
    pub managed: BTreeMap<IdentityKey, ManagedEntry>,
    /// Problems met while resolving ancestors and imports
    pub warnings: Vec<Warning>,
    complete: bool,
}

impl EffectiveModel {
    /// The descriptor's own direct dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[DeclaredDependency] {
        &self.view.dependencies
    }

    /// First direct dependency with identity `key`.
    #[must_use]
    pub fn direct_dependency(&self, key: &IdentityKey) -> Option<&DeclaredDependency> {
        self.view.dependencies.iter().find(|d| &d.identity_key() == key)
    }

    /// The managed entry for `key`.
    #[must_use]
    pub fn managed_entry(&self, key: &IdentityKey) -> Option<&ManagedEntry> {
        self.managed.get(key)
    }

    /// Whether every ancestor and import was resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Guards BOM import recursion. `visited` holds the imports currently being
/// expanded, so a BOM imported twice side by side is not mistaken for a cycle.
struct ImportGuard {
    depth: usize,
    visited: HashSet<String>,
}

pub(super) fn build(resolver: &InheritanceResolver<'_>, descriptor: &Descriptor) -> EffectiveModel {
    let mut guard = ImportGuard {
        depth: 0,
        visited: HashSet::new(),
    };
    build_guarded(resolver, descriptor, &mut guard)
}

fn build_guarded(
    resolver: &InheritanceResolver<'_>,
    descriptor: &Descriptor,
    guard: &mut ImportGuard,
) -> EffectiveModel {
    let lineage = resolver.lineage(descriptor);
    let mut warnings = Vec::new();
    let mut complete = true;

    if let Some((parent, reason)) = lineage.unresolved() {
        complete = false;
        warnings.push(Warning::AncestorResolution {
            ancestor: parent.gav(),
            reason: reason.to_string(),
        });
    }

    let mut properties = descriptor.view.declared_properties();
    for (name, value) in implicit_entries(&descriptor.view) {
        properties.insert(name, value);
    }
    for ancestor in lineage.resolved() {
        for decl in &ancestor.view.properties {
            properties.insert_if_absent(&decl.name, &decl.value);
        }
    }

    let mut managed = BTreeMap::new();
    for entry in &descriptor.view.dependency_management {
        managed.entry(entry.identity_key()).or_insert_with(|| ManagedEntry {
            version: entry.version.clone(),
            scope: entry.scope.clone(),
            origin: ManagedOrigin::Local {
                path: entry.path.clone(),
                version_path: entry.version_path.clone(),
            },
        });
    }
    for ancestor in lineage.resolved() {
        let gav = ancestor.gav();
        for entry in &ancestor.view.dependency_management {
            managed.entry(entry.identity_key()).or_insert_with(|| ManagedEntry {
                version: entry.version.clone(),
                scope: entry.scope.clone(),
                origin: ManagedOrigin::Inherited {
                    ancestor: gav.clone(),
                },
            });
        }
    }

    let imports: Vec<&DeclaredDependency> = std::iter::once(descriptor)
        .chain(lineage.resolved())
        .flat_map(|d| d.view.dependency_management.iter())
        .filter(|entry| entry.is_bom_import())
        .collect();

    for import in imports {
        match import_bom(resolver, import, &properties, guard) {
            Ok(imported) => {
                debug!("Imported {} managed entries from {}", imported.entries.len(), imported.gav);
                for (key, entry) in imported.entries {
                    managed.entry(key).or_insert(entry);
                }
                if !imported.warnings.is_empty() {
                    complete = false;
                    for warning in imported.warnings {
                        if !warnings.contains(&warning) {
                            warnings.push(warning);
                        }
                    }
                }
            }
            Err(warning) => {
                warn!("{}", warning);
                complete = false;
                warnings.push(warning);
            }
        }
    }

    EffectiveModel {
        path: descriptor.path.clone(),
        view: descriptor.view.clone(),
        properties,
        managed,
        warnings,
        complete,
    }
}

fn implicit_entries(view: &PomView) -> Vec<(String, String)> {
    let implicit = view.implicit_properties();
    [
        "project.groupId",
        "project.artifactId",
        "project.version",
        "project.parent.groupId",
        "project.parent.version",
    ]
    .into_iter()
    .filter_map(|name| implicit.get(name).map(|value| (name.to_string(), value.to_string())))
    .collect()
}

/// Managed entries contributed by one BOM, plus problems met inside it.
struct ImportedBom {
    gav: String,
    entries: Vec<(IdentityKey, ManagedEntry)>,
    warnings: Vec<Warning>,
}

fn import_bom(
    resolver: &InheritanceResolver<'_>,
    import: &DeclaredDependency,
    properties: &PropertyTable,
    guard: &mut ImportGuard,
) -> Result<ImportedBom, Warning> {
    let raw_version = import.version.clone().unwrap_or_default();
    let unresolved = |reason: String| Warning::AncestorResolution {
        ancestor: format!("{}:{}:{}", import.group_id, import.artifact_id, raw_version),
        reason,
    };

    let version = properties
        .resolve(&raw_version)
        .map_err(|e| {
            unresolved(format!("undefined property '{}' in import version", e.placeholder))
        })?;
    let gav = format!("{}:{}:{}", import.group_id, import.artifact_id, version);

    let max_depth = resolver.context().max_inheritance_depth;
    if guard.depth >= max_depth {
        return Err(unresolved(UnresolvedReason::DepthExceeded(max_depth).to_string()));
    }
    if !guard.visited.insert(gav.clone()) {
        return Err(unresolved(format!("import cycle through {gav}")));
    }

    let bom = match resolver.locate_in_roots(&import.group_id, &import.artifact_id, &version) {
        Ok(bom) => bom,
        Err(reason) => {
            guard.visited.remove(&gav);
            return Err(unresolved(reason.to_string()));
        }
    };

    guard.depth += 1;
    let model = build_guarded(resolver, &bom, guard);
    guard.depth -= 1;
    guard.visited.remove(&gav);

    let entries = model
        .managed
        .into_iter()
        .map(|(key, entry)| {
            let version = entry
                .version
                .map(|raw| model.properties.resolve(&raw).unwrap_or(raw));
            let imported = ManagedEntry {
                version,
                scope: entry.scope,
                origin: ManagedOrigin::Imported {
                    bom: gav.clone(),
                },
            };
            (key, imported)
        })
        .collect();

    Ok(ImportedBom {
        gav,
        entries,
        warnings: model.warnings,
    })
}
