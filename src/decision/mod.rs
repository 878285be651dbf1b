//! Classification of requested coordinates into patch actions.
//!
//! Each request is judged against the [`EffectiveModel`] in four steps:
//!
//! 1. existing versions are expanded with the merged property table; an
//!    unexpandable direct version leaves the dependency untouched
//! 2. with `prefer_dependency_management`, a managed version that is at least the
//!    requested one covers the request; a dependency with its own `<version>`
//!    skips this step while `honor_explicit_versions` is set
//! 3. a direct dependency is upgraded when the request is newer (or, with
//!    `overwrite_on_downgrade`, whenever it differs downward)
//! 4. anything else is inserted
//!
//! When the parent chain is incomplete, a changed decision carries the ancestor
//! warnings as notes only if a lost ancestor's `dependencyManagement` could have
//! decided it differently.
//!
//! [`plan`] runs [`classify`] over a whole request list: when two requests share an
//! identity key the later one wins, and when several upgrades land on the same
//! node (two dependencies sharing one `${version}` property) only the highest
//! version is written.

#[cfg(test)]
mod decision_tests;

use crate::core::OperationContext;
use crate::pom::{Coordinate, DeclaredDependency, single_property};
use crate::report::{Reason, Warning};
use crate::resolver::{EffectiveModel, ManagedEntry, ManagedOrigin};
use crate::version::MavenVersion;
use crate::xml::NodePath;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// The node an upgrade rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeTarget {
    /// Text of the dependency's own `<version>`
    VersionText { path: NodePath },
    /// Text of a local `<properties>` entry referenced as `${name}`
    Property { name: String, path: NodePath },
    /// Text of the `<version>` of a local `dependencyManagement` entry
    ManagedVersion { path: NodePath },
    /// A new `<version>` element inside the dependency at `dependency`
    AddVersion { dependency: NodePath },
}

impl UpgradeTarget {
    /// Path of the element that will be edited.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        match self {
            Self::VersionText { path }
            | Self::Property { path, .. }
            | Self::ManagedVersion { path } => path,
            Self::AddVersion { dependency } => dependency,
        }
    }
}

/// What the patcher must do for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Unchanged,
    Upgrade {
        target: UpgradeTarget,
        from: String,
        to: String,
    },
    Insert {
        coordinate: Coordinate,
        /// `false` when the version is left to `dependencyManagement`
        with_version: bool,
    },
}

/// A classified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub coordinate: Coordinate,
    pub action: Action,
    pub reason: Reason,
    pub notes: Vec<Warning>,
}

impl Decision {
    fn new(coordinate: &Coordinate, action: Action, reason: Reason) -> Self {
        Self {
            coordinate: coordinate.clone(),
            action,
            reason,
            notes: Vec::new(),
        }
    }

    fn unchanged(coordinate: &Coordinate, reason: Reason) -> Self {
        Self::new(coordinate, Action::Unchanged, reason)
    }
}

/// Classify one requested coordinate.
#[must_use]
pub fn classify(
    model: &EffectiveModel,
    request: &Coordinate,
    context: &OperationContext,
) -> Decision {
    let key = request.identity_key();
    let requested = MavenVersion::parse(&request.version);
    let direct = model.direct_dependency(&key);
    let managed = model.managed_entry(&key);
    let mut notes = Vec::new();

    let mut decision = 'decide: {
        // Step 2: dependency management coverage.
        if context.prefer_dependency_management
            && let Some(entry) = managed
            && let Some(raw) = &entry.version
        {
            let explicit = direct.is_some_and(|d| d.version.is_some());
            if !(context.honor_explicit_versions && explicit) {
                match model.properties.resolve(raw) {
                    Ok(version) if MavenVersion::parse(&version) >= requested => {
                        debug!("{} covered by managed version {}", key, version);
                        break 'decide match direct {
                            None if context.insert_managed_dependencies => Decision::new(
                                request,
                                Action::Insert {
                                    coordinate: request.clone(),
                                    with_version: false,
                                },
                                Reason::VersionManagedByDependencyManagement,
                            ),
                            _ => Decision::unchanged(
                                request,
                                Reason::CoveredByDependencyManagement,
                            ),
                        };
                    }
                    Ok(_) => {}
                    Err(unresolved) => notes.push(Warning::UnresolvablePlaceholder {
                        dependency: key.to_string(),
                        placeholder: unresolved.placeholder,
                        value: unresolved.value,
                    }),
                }
            }
        }

        // Step 3: direct dependency.
        if let Some(dependency) = direct {
            break 'decide classify_direct(
                model, request, &requested, dependency, managed, context, &mut notes,
            );
        }

        // Step 4: insert.
        Decision::new(
            request,
            Action::Insert {
                coordinate: request.clone(),
                with_version: true,
            },
            Reason::NotDeclared,
        )
    };

    if decision.action != Action::Unchanged
        && !model.is_complete()
        && missing_ancestors_matter(direct, managed, context)
    {
        notes.extend(
            model
                .warnings
                .iter()
                .filter(|w| matches!(w, Warning::AncestorResolution { .. }))
                .cloned(),
        );
    }
    decision.notes.extend(notes);
    decision
}

/// Whether an ancestor the resolver could not reach might have managed the request
/// and so produced a different decision.
fn missing_ancestors_matter(
    direct: Option<&DeclaredDependency>,
    managed: Option<&ManagedEntry>,
    context: &OperationContext,
) -> bool {
    let consulted = match direct {
        None => context.prefer_dependency_management,
        Some(dependency) if dependency.version.is_none() => true,
        Some(_) => context.prefer_dependency_management && !context.honor_explicit_versions,
    };
    consulted && managed.is_none_or(|entry| !entry.is_declared())
}

fn classify_direct(
    model: &EffectiveModel,
    request: &Coordinate,
    requested: &MavenVersion,
    dependency: &DeclaredDependency,
    managed: Option<&ManagedEntry>,
    context: &OperationContext,
    notes: &mut Vec<Warning>,
) -> Decision {
    let (raw, target) = match (&dependency.version, &dependency.version_path) {
        (Some(raw), Some(path)) => {
            (Some(raw.as_str()), version_target(model, raw, path, context, false))
        }
        _ => match managed {
            Some(ManagedEntry {
                version: Some(raw),
                origin: ManagedOrigin::Local {
                    version_path: Some(path),
                    ..
                },
                ..
            }) => (Some(raw.as_str()), version_target(model, raw, path, context, true)),
            Some(entry) => (
                entry.version.as_deref(),
                UpgradeTarget::AddVersion {
                    dependency: dependency.path.clone(),
                },
            ),
            None => (
                None,
                UpgradeTarget::AddVersion {
                    dependency: dependency.path.clone(),
                },
            ),
        },
    };

    let Some(raw) = raw else {
        // Declared without any version we can see: pin the requested one.
        return Decision::new(
            request,
            Action::Upgrade {
                target,
                from: String::new(),
                to: request.version.clone(),
            },
            Reason::NewerVersionRequested,
        );
    };

    let existing = match model.properties.resolve(raw) {
        Ok(existing) => existing,
        Err(unresolved) => {
            notes.push(Warning::UnresolvablePlaceholder {
                dependency: dependency.identity_key().to_string(),
                placeholder: unresolved.placeholder,
                value: unresolved.value,
            });
            return Decision::unchanged(request, Reason::UnresolvableVersion);
        }
    };

    let reason = match requested.cmp(&MavenVersion::parse(&existing)) {
        Ordering::Greater => Reason::NewerVersionRequested,
        Ordering::Less if context.overwrite_on_downgrade => Reason::ForcedVersionReplacement,
        _ => return Decision::unchanged(request, Reason::AlreadySatisfied),
    };

    debug!("{}: {} -> {} ({})", dependency.identity_key(), existing, request.version, reason);
    Decision::new(
        request,
        Action::Upgrade {
            target,
            from: existing,
            to: request.version.clone(),
        },
        reason,
    )
}

fn version_target(
    model: &EffectiveModel,
    raw: &str,
    version_path: &NodePath,
    context: &OperationContext,
    managed: bool,
) -> UpgradeTarget {
    if context.update_properties
        && let Some(name) = single_property(raw)
        && let Some(decl) = model.view.property(name)
    {
        return UpgradeTarget::Property {
            name: name.to_string(),
            path: decl.path.clone(),
        };
    }
    if managed {
        UpgradeTarget::ManagedVersion {
            path: version_path.clone(),
        }
    } else {
        UpgradeTarget::VersionText {
            path: version_path.clone(),
        }
    }
}

/// Classify a whole request list, in order.
///
/// Returns one decision per request.
#[must_use]
pub fn plan(
    model: &EffectiveModel,
    requests: &[Coordinate],
    context: &OperationContext,
) -> Vec<Decision> {
    let mut last_index = HashMap::new();
    for (index, request) in requests.iter().enumerate() {
        last_index.insert(request.identity_key(), index);
    }

    let mut decisions: Vec<Decision> = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let winner = last_index[&request.identity_key()];
            if winner == index {
                return classify(model, request, context);
            }
            let mut decision = Decision::unchanged(request, Reason::SupersededByLaterRequest);
            decision.notes.push(Warning::SupersededRequest {
                requested: request.to_string(),
                superseded_by: requests[winner].to_string(),
            });
            decision
        })
        .collect();

    merge_shared_targets(&mut decisions);
    decisions
}

/// Keep only the highest upgrade per edited node; the rest are satisfied by it.
fn merge_shared_targets(decisions: &mut [Decision]) {
    let mut best: HashMap<NodePath, usize> = HashMap::new();
    for (index, decision) in decisions.iter().enumerate() {
        let Action::Upgrade { target, to, .. } = &decision.action else {
            continue;
        };
        best.entry(target.path().clone())
            .and_modify(|current| {
                if let Action::Upgrade { to: current_to, .. } = &decisions[*current].action
                    && MavenVersion::parse(to) > MavenVersion::parse(current_to)
                {
                    *current = index;
                }
            })
            .or_insert(index);
    }

    for (index, decision) in decisions.iter_mut().enumerate() {
        if let Action::Upgrade { target, .. } = &decision.action
            && best.get(target.path()) != Some(&index)
        {
            debug!("{} satisfied by a shared upgrade of {}", decision.coordinate, target.path());
            decision.action = Action::Unchanged;
            decision.reason = Reason::AlreadySatisfied;
        }
    }
}
