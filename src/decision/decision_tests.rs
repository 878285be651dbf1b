use super::*;
use crate::resolver::{Descriptor, InheritanceResolver};

fn model(body: &str, context: &OperationContext) -> EffectiveModel {
    let source = format!(
        "<project>\n  <groupId>com.acme</groupId>\n  <artifactId>app</artifactId>\n  <version>1.0</version>\n{body}\n</project>\n"
    );
    let descriptor = Descriptor::from_source(&source, "/work/app/pom.xml").unwrap();
    InheritanceResolver::new(context).resolve(&descriptor)
}

fn dependency(group: &str, artifact: &str, version: Option<&str>) -> String {
    let version = version.map_or(String::new(), |v| format!("<version>{v}</version>"));
    format!(
        "<dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId>{version}</dependency>"
    )
}

fn direct(deps: &[String]) -> String {
    format!("  <dependencies>{}</dependencies>", deps.concat())
}

fn managed(deps: &[String]) -> String {
    format!(
        "  <dependencyManagement><dependencies>{}</dependencies></dependencyManagement>",
        deps.concat()
    )
}

fn request(spec: &str) -> Coordinate {
    spec.parse().unwrap()
}

#[test]
fn test_insert_when_not_declared() {
    let context = OperationContext::default();
    let model = model("", &context);
    let decision = classify(&model, &request("org.example:lib:1.0"), &context);
    assert_eq!(decision.reason, Reason::NotDeclared);
    assert!(matches!(decision.action, Action::Insert { with_version: true, .. }));
}

#[test]
fn test_upgrade_direct_dependency() {
    let context = OperationContext::default();
    let model = model(&direct(&[dependency("g", "a", Some("1.0.0"))]), &context);
    let decision = classify(&model, &request("g:a:2.0.0"), &context);

    let Action::Upgrade { target, from, to } = &decision.action else {
        panic!("expected upgrade, got {:?}", decision.action);
    };
    assert!(matches!(target, UpgradeTarget::VersionText { .. }));
    assert_eq!(from, "1.0.0");
    assert_eq!(to, "2.0.0");
    assert_eq!(decision.reason, Reason::NewerVersionRequested);
}

#[test]
fn test_already_satisfied() {
    let context = OperationContext::default();
    let model = model(&direct(&[dependency("g", "a", Some("1.10.0"))]), &context);
    for version in ["1.2.0", "1.10.0", "1.10.0-SNAPSHOT"] {
        let decision = classify(&model, &request(&format!("g:a:{version}")), &context);
        assert_eq!(decision.action, Action::Unchanged, "{version}");
        assert_eq!(decision.reason, Reason::AlreadySatisfied);
    }
}

#[test]
fn test_overwrite_on_downgrade() {
    let context = OperationContext::default().with_overwrite_on_downgrade(true);
    let model = model(&direct(&[dependency("g", "a", Some("2.0"))]), &context);

    let decision = classify(&model, &request("g:a:1.5"), &context);
    assert_eq!(decision.reason, Reason::ForcedVersionReplacement);
    assert!(matches!(decision.action, Action::Upgrade { .. }));

    let decision = classify(&model, &request("g:a:2.0"), &context);
    assert_eq!(decision.action, Action::Unchanged);
}

#[test]
fn test_covered_by_management() {
    let context = OperationContext::default();
    let model = model(&managed(&[dependency("g", "a", Some("2.0.0"))]), &context);
    let decision = classify(&model, &request("g:a:1.0.0"), &context);
    assert_eq!(decision.action, Action::Unchanged);
    assert_eq!(decision.reason, Reason::CoveredByDependencyManagement);
}

#[test]
fn test_management_ignored_when_disabled() {
    let context = OperationContext::default().with_prefer_dependency_management(false);
    let model = model(&managed(&[dependency("g", "a", Some("2.0.0"))]), &context);
    let decision = classify(&model, &request("g:a:1.0.0"), &context);
    assert!(matches!(decision.action, Action::Insert { with_version: true, .. }));
}

#[test]
fn test_insert_managed_without_version() {
    let context = OperationContext::default().with_insert_managed_dependencies(true);
    let model = model(&managed(&[dependency("g", "a", Some("2.0.0"))]), &context);
    let decision = classify(&model, &request("g:a:1.0.0"), &context);
    assert_eq!(decision.reason, Reason::VersionManagedByDependencyManagement);
    assert!(matches!(decision.action, Action::Insert { with_version: false, .. }));
}

#[test]
fn test_lower_managed_version_does_not_cover() {
    let context = OperationContext::default();
    let model = model(&managed(&[dependency("g", "a", Some("1.0"))]), &context);
    let decision = classify(&model, &request("g:a:2.0"), &context);
    assert!(matches!(decision.action, Action::Insert { with_version: true, .. }));
}

#[test]
fn test_explicit_version_beats_management() {
    let body = format!(
        "{}\n{}",
        managed(&[dependency("g", "a", Some("3.0"))]),
        direct(&[dependency("g", "a", Some("1.0"))])
    );

    let honoring = OperationContext::default();
    let decision = classify(&model(&body, &honoring), &request("g:a:2.0"), &honoring);
    assert!(matches!(decision.action, Action::Upgrade { .. }));

    let trusting = OperationContext::default().with_honor_explicit_versions(false);
    let decision = classify(&model(&body, &trusting), &request("g:a:2.0"), &trusting);
    assert_eq!(decision.reason, Reason::CoveredByDependencyManagement);
}

#[test]
fn test_property_version_upgrades_property() {
    let context = OperationContext::default();
    let body = format!(
        "  <properties><a.version>1.0</a.version></properties>\n{}",
        direct(&[dependency("g", "a", Some("${a.version}"))])
    );
    let model = model(&body, &context);
    let decision = classify(&model, &request("g:a:1.1"), &context);
    let Action::Upgrade { target, from, .. } = &decision.action else {
        panic!("expected upgrade");
    };
    assert!(matches!(target, UpgradeTarget::Property { name, .. } if name == "a.version"));
    assert_eq!(from, "1.0");

    let context = OperationContext::default().with_update_properties(false);
    let decision = classify(&model, &request("g:a:1.1"), &context);
    assert!(matches!(
        decision.action,
        Action::Upgrade { target: UpgradeTarget::VersionText { .. }, .. }
    ));
}

#[test]
fn test_unresolvable_direct_version() {
    let context = OperationContext::default();
    let model = model(&direct(&[dependency("g", "a", Some("${missing}"))]), &context);
    let decision = classify(&model, &request("g:a:9.9"), &context);
    assert_eq!(decision.action, Action::Unchanged);
    assert_eq!(decision.reason, Reason::UnresolvableVersion);
    assert!(matches!(
        &decision.notes[..],
        [Warning::UnresolvablePlaceholder { placeholder, .. }] if placeholder == "missing"
    ));
}

#[test]
fn test_unresolvable_managed_version_falls_through() {
    let context = OperationContext::default();
    let model = model(&managed(&[dependency("g", "a", Some("${nope}"))]), &context);
    let decision = classify(&model, &request("g:a:1.0"), &context);
    assert!(matches!(decision.action, Action::Insert { .. }));
    assert_eq!(decision.notes.len(), 1);
}

#[test]
fn test_versionless_direct_upgrades_local_management() {
    let context = OperationContext::default();
    let body = format!(
        "{}\n{}",
        managed(&[dependency("g", "a", Some("1.0"))]),
        direct(&[dependency("g", "a", None)])
    );
    let model = model(&body, &context);
    let decision = classify(&model, &request("g:a:2.0"), &context);
    assert!(matches!(
        decision.action,
        Action::Upgrade { target: UpgradeTarget::ManagedVersion { .. }, .. }
    ));
}

#[test]
fn test_versionless_direct_without_management_pins_version() {
    let context = OperationContext::default();
    let model = model(&direct(&[dependency("g", "a", None)]), &context);
    let decision = classify(&model, &request("g:a:2.0"), &context);
    let Action::Upgrade { target, from, .. } = &decision.action else {
        panic!("expected upgrade");
    };
    assert!(matches!(target, UpgradeTarget::AddVersion { .. }));
    assert!(from.is_empty());
}

#[test]
fn test_classifier_and_type_distinguish_identity() {
    let context = OperationContext::default();
    let model = model(&direct(&[dependency("g", "a", Some("1.0"))]), &context);
    let decision = classify(&model, &request("g:a:jar:tests:2.0"), &context);
    assert!(matches!(decision.action, Action::Insert { .. }));
}

#[test]
fn test_plan_last_request_wins() {
    let context = OperationContext::default();
    let model = model("", &context);
    let requests = [request("g:a:1.0"), request("g:b:1.0"), request("g:a:2.0")];
    let decisions = plan(&model, &requests, &context);

    assert_eq!(decisions.len(), 3);
    assert_eq!(decisions[0].action, Action::Unchanged);
    assert_eq!(decisions[0].reason, Reason::SupersededByLaterRequest);
    assert!(matches!(&decisions[0].notes[..], [Warning::SupersededRequest { .. }]));
    assert!(matches!(
        &decisions[2].action,
        Action::Insert { coordinate, .. } if coordinate.version == "2.0"
    ));
}

#[test]
fn test_plan_shared_property_takes_highest() {
    let context = OperationContext::default();
    let body = format!(
        "  <properties><v>1.0</v></properties>\n{}",
        direct(&[dependency("g", "a", Some("${v}")), dependency("g", "b", Some("${v}"))])
    );
    let model = model(&body, &context);
    let decisions = plan(&model, &[request("g:a:2.0"), request("g:b:1.5")], &context);

    assert!(matches!(&decisions[0].action, Action::Upgrade { to, .. } if to == "2.0"));
    assert_eq!(decisions[1].action, Action::Unchanged);
    assert_eq!(decisions[1].reason, Reason::AlreadySatisfied);
}

#[test]
fn test_missing_ancestor_noted_only_when_it_could_matter() {
    let context = OperationContext::default();
    let parent = "  <parent><groupId>com.acme</groupId><artifactId>gone</artifactId><version>1</version><relativePath>nowhere/pom.xml</relativePath></parent>";
    let body = format!(
        "{parent}\n{}\n{}",
        managed(&[dependency("g", "managed", Some("1.0"))]),
        direct(&[dependency("g", "pinned", Some("1.0"))])
    );
    let model = model(&body, &context);
    assert!(!model.is_complete());
    let ancestor_noted = |decision: &Decision| {
        decision.notes.iter().any(|w| matches!(w, Warning::AncestorResolution { .. }))
    };

    // The lost parent could have managed an undeclared artifact.
    let decision = classify(&model, &request("g:new:1.0"), &context);
    assert!(matches!(decision.action, Action::Insert { .. }));
    assert!(ancestor_noted(&decision));

    // An explicit version is judged on its own.
    let decision = classify(&model, &request("g:pinned:2.0"), &context);
    assert!(matches!(decision.action, Action::Upgrade { .. }));
    assert!(!ancestor_noted(&decision));

    // A local management entry is nearer than any lost ancestor.
    let decision = classify(&model, &request("g:managed:2.0"), &context);
    assert!(matches!(decision.action, Action::Insert { .. }));
    assert!(!ancestor_noted(&decision));
}
