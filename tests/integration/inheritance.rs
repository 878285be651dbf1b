use pomup_cli::operation::{self, Outcome, Reason, Warning};
use pomup_cli::pom::Coordinate;
use pomup_cli::test_utils::{PomFixture, pom_xml};

const MANAGED_PARENT_BODY: &str = "    <packaging>pom</packaging>\n    <properties>\n        <netty.version>4.1.110.Final</netty.version>\n    </properties>\n    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>org.example</groupId>\n                <artifactId>core</artifactId>\n                <version>2.0.0</version>\n            </dependency>\n            <dependency>\n                <groupId>io.netty</groupId>\n                <artifactId>netty-handler</artifactId>\n                <version>${netty.version}</version>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n";

fn coordinate(spec: &str) -> Coordinate {
    spec.parse().unwrap()
}

fn modify(
    fixture: &PomFixture,
    pom: &std::path::Path,
    requests: &[&str],
) -> operation::ModifiedOutput {
    let project = operation::load(pom, &fixture.context())
        .unwrap()
        .builder()
        .with_dependencies(requests.iter().map(|s| coordinate(s)))
        .build();
    operation::modify(project).unwrap()
}

fn child_pom(body: &str) -> String {
    pom_xml("org.example", "child", "1.0.0", Some(("org.example", "parent", "1.0.0")), body)
}

#[test]
fn test_ancestor_management_covers_request() {
    let fixture = PomFixture::new().unwrap();
    fixture
        .write_pom("pom.xml", &pom_xml("org.example", "parent", "1.0.0", None, MANAGED_PARENT_BODY))
        .unwrap();
    let child = fixture.write_pom("child/pom.xml", &child_pom("")).unwrap();
    let original = fixture.read("child/pom.xml").unwrap();

    let output = modify(&fixture, &child, &["org.example:core:1.0.0"]);

    assert_eq!(output.text, original);
    assert_eq!(output.changes[0].reason, Reason::CoveredByDependencyManagement);
    assert!(!output.text.contains("<dependencies>"));
}

#[test]
fn test_managed_property_resolves_in_ancestor_scope() {
    let fixture = PomFixture::new().unwrap();
    fixture
        .write_pom("pom.xml", &pom_xml("org.example", "parent", "1.0.0", None, MANAGED_PARENT_BODY))
        .unwrap();
    let child = fixture.write_pom("child/pom.xml", &child_pom("")).unwrap();

    let covered = modify(&fixture, &child, &["io.netty:netty-handler:4.1.100.Final"]);
    assert!(!covered.has_changes());

    let newer = modify(&fixture, &child, &["io.netty:netty-handler:4.1.111.Final"]);
    assert!(matches!(newer.changes[0].outcome, Outcome::Inserted));
    assert!(newer.text.contains("<version>4.1.111.Final</version>"));
}

#[test]
fn test_parent_found_in_repository_root() {
    let fixture = PomFixture::new().unwrap();
    fixture
        .install_pom(
            "org.example",
            "parent",
            "1.0.0",
            &pom_xml("org.example", "parent", "1.0.0", None, MANAGED_PARENT_BODY),
        )
        .unwrap();
    let child = fixture.write_pom("app/pom.xml", &child_pom("")).unwrap();

    let output = modify(&fixture, &child, &["org.example:core:1.5.0"]);
    assert!(!output.has_changes());
    assert!(output.warnings.is_empty());
}

#[test]
fn test_missing_parent_degrades_to_local_data() {
    let fixture = PomFixture::new().unwrap();
    let child = fixture.write_pom("app/pom.xml", &child_pom("")).unwrap();

    let output = modify(&fixture, &child, &["org.example:core:1.0.0"]);

    assert!(matches!(output.changes[0].outcome, Outcome::Inserted));
    assert!(
        output
            .warnings
            .iter()
            .any(|w| matches!(
                w,
                Warning::AncestorResolution { ancestor, .. } if ancestor == "org.example:parent:1.0.0"
            ))
    );
    assert!(
        output.changes[0]
            .notes
            .iter()
            .any(|w| matches!(w, Warning::AncestorResolution { .. }))
    );
}

#[test]
fn test_parent_cycle_terminates_with_warning() {
    let fixture = PomFixture::new().unwrap();
    let a = pom_xml("org.example", "a", "1", Some(("org.example", "b", "1")), "").replace(
        "        <version>1</version>\n    </parent>",
        "        <version>1</version>\n        <relativePath>../b/pom.xml</relativePath>\n    </parent>",
    );
    let b = pom_xml("org.example", "b", "1", Some(("org.example", "a", "1")), "").replace(
        "        <version>1</version>\n    </parent>",
        "        <version>1</version>\n        <relativePath>../a/pom.xml</relativePath>\n    </parent>",
    );
    let a_path = fixture.write_pom("a/pom.xml", &a).unwrap();
    fixture.write_pom("b/pom.xml", &b).unwrap();

    let output = modify(&fixture, &a_path, &["org.example:lib:1.0"]);

    assert!(matches!(output.changes[0].outcome, Outcome::Inserted));
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        Warning::AncestorResolution { reason, .. } if reason.contains("cycle")
    )));
}

#[test]
fn test_bom_import_covers_request() {
    let fixture = PomFixture::new().unwrap();
    fixture
        .install_pom(
            "org.example",
            "platform-bom",
            "3.0.0",
            &pom_xml("org.example", "platform-bom", "3.0.0", None, MANAGED_PARENT_BODY),
        )
        .unwrap();
    let app = fixture
        .write_pom(
            "pom.xml",
            &pom_xml(
                "org.example",
                "app",
                "1.0.0",
                None,
                "    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>org.example</groupId>\n                <artifactId>platform-bom</artifactId>\n                <version>3.0.0</version>\n                <type>pom</type>\n                <scope>import</scope>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n",
            ),
        )
        .unwrap();

    let output =
        modify(&fixture, &app, &["org.example:core:2.0.0", "io.netty:netty-handler:4.1.0.Final"]);
    assert!(!output.has_changes());
    assert!(output.warnings.is_empty());
}

#[test]
fn test_local_managed_entry_is_upgraded_in_place() {
    let fixture = PomFixture::new().unwrap();
    let body = "    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>org.example</groupId>\n                <artifactId>core</artifactId>\n                <version>1.0.0</version>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n    <dependencies>\n        <dependency>\n            <groupId>org.example</groupId>\n            <artifactId>core</artifactId>\n        </dependency>\n    </dependencies>\n";
    let app =
        fixture.write_pom("pom.xml", &pom_xml("org.example", "app", "1.0.0", None, body)).unwrap();
    let original = fixture.read("pom.xml").unwrap();

    let output = modify(&fixture, &app, &["org.example:core:1.2.0"]);

    assert_eq!(
        output.text,
        original.replace(
            "<artifactId>core</artifactId>\n                <version>1.0.0</version>",
            "<artifactId>core</artifactId>\n                <version>1.2.0</version>"
        )
    );
    assert!(matches!(
        &output.changes[0].outcome,
        Outcome::Upgraded { from, to } if from == "1.0.0" && to == "1.2.0"
    ));
}
