use pomup_cli::core::OperationContext;
use pomup_cli::operation::{self, Outcome, Reason, Warning};
use pomup_cli::pom::Coordinate;
use pomup_cli::test_utils::{PomFixture, init_test_logging};

const SERVICE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- service descriptor -->
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.example</groupId>
  <artifactId>service</artifactId>
  <version>1.0.0-SNAPSHOT</version>

  <properties>
    <jackson.version>2.15.0</jackson.version>
    <java.version>17</java.version>
  </properties>

  <dependencies>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-databind</artifactId>
      <version>${jackson.version}</version>
    </dependency>
    <dependency>
      <groupId>org.yaml</groupId>
      <artifactId>snakeyaml</artifactId>
      <version>1.33</version><!-- pinned -->
    </dependency>
  </dependencies>
</project>
"#;

fn coordinate(spec: &str) -> Coordinate {
    spec.parse().unwrap()
}

fn run(text: &str, requests: &[&str]) -> operation::ModifiedOutput {
    let loaded =
        operation::load_str(text, "/work/service/pom.xml", &OperationContext::new()).unwrap();
    let project =
        loaded.builder().with_dependencies(requests.iter().map(|s| coordinate(s))).build();
    operation::modify(project).unwrap()
}

#[test]
fn test_no_op_request_preserves_every_byte() {
    init_test_logging(None);
    let output = run(
        SERVICE_POM,
        &["org.yaml:snakeyaml:1.33", "com.fasterxml.jackson.core:jackson-databind:2.14.0"],
    );

    assert_eq!(output.text, SERVICE_POM);
    assert!(!output.has_changes());
    assert!(output.changes.iter().all(|c| c.reason == Reason::AlreadySatisfied));
}

#[test]
fn test_upgrade_through_property_and_literal() {
    let output = run(
        SERVICE_POM,
        &["com.fasterxml.jackson.core:jackson-databind:2.17.1", "org.yaml:snakeyaml:2.2"],
    );

    let expected = SERVICE_POM
        .replace("<jackson.version>2.15.0<", "<jackson.version>2.17.1<")
        .replace("<version>1.33</version>", "<version>2.2</version>");
    assert_eq!(output.text, expected);
    assert!(output.text.contains("<version>${jackson.version}</version>"));
    assert!(matches!(
        &output.changes[0].outcome,
        Outcome::Upgraded { from, to } if from == "2.15.0" && to == "2.17.1"
    ));
}

#[test]
fn test_second_run_is_idempotent() {
    let requests = [
        "com.fasterxml.jackson.core:jackson-databind:2.17.1",
        "org.apache.commons:commons-text:1.12.0",
        "org.junit.jupiter:junit-jupiter:5.10.2@test",
    ];
    let first = run(SERVICE_POM, &requests);
    assert!(first.has_changes());

    let second = run(&first.text, &requests);
    assert!(!second.has_changes());
    assert_eq!(second.text, first.text);
}

#[test]
fn test_insertions_follow_request_order_and_sibling_indent() {
    let output = run(
        SERVICE_POM,
        &["org.apache.commons:commons-text:1.12.0", "org.junit.jupiter:junit-jupiter:5.10.2@test"],
    );

    let text = &output.text;
    let commons = text.find("<artifactId>commons-text</artifactId>").unwrap();
    let junit = text.find("<artifactId>junit-jupiter</artifactId>").unwrap();
    let snakeyaml = text.find("<artifactId>snakeyaml</artifactId>").unwrap();
    assert!(snakeyaml < commons && commons < junit);
    assert!(text.contains(
        "    <dependency>\n      <groupId>org.apache.commons</groupId>\n      <artifactId>commons-text</artifactId>\n      <version>1.12.0</version>\n    </dependency>\n"
    ));
    assert!(text.contains("      <scope>test</scope>\n"));
    assert!(text.ends_with("  </dependencies>\n</project>\n"));
}

#[test]
fn test_new_container_is_created_and_indented() {
    let source = "<project>\n    <modelVersion>4.0.0</modelVersion>\n    <artifactId>bare</artifactId>\n    <build>\n        <finalName>bare</finalName>\n    </build>\n</project>\n";
    let output = run(source, &["org.slf4j:slf4j-api:2.0.13"]);

    let expected = "<project>\n    <modelVersion>4.0.0</modelVersion>\n    <artifactId>bare</artifactId>\n    <dependencies>\n        <dependency>\n            <groupId>org.slf4j</groupId>\n            <artifactId>slf4j-api</artifactId>\n            <version>2.0.13</version>\n        </dependency>\n    </dependencies>\n    <build>\n        <finalName>bare</finalName>\n    </build>\n</project>\n";
    assert_eq!(output.text, expected);
    assert!(matches!(output.changes[0].outcome, Outcome::Inserted));
}

#[test]
fn test_version_ordering_drives_decisions() {
    let source = "<project>\n  <dependencies>\n    <dependency>\n      <groupId>g</groupId>\n      <artifactId>a</artifactId>\n      <version>1.2.0</version>\n    </dependency>\n  </dependencies>\n</project>\n";

    let output = run(source, &["g:a:1.10.0"]);
    assert!(output.text.contains("<version>1.10.0</version>"));

    let output = run(&output.text, &["g:a:1.10.0-SNAPSHOT"]);
    assert!(!output.has_changes());
}

#[test]
fn test_downgrade_requires_opt_in() {
    let source = "<project>\n  <dependencies>\n    <dependency>\n      <groupId>g</groupId>\n      <artifactId>a</artifactId>\n      <version>2.0</version>\n    </dependency>\n  </dependencies>\n</project>\n";

    let output = run(source, &["g:a:1.0"]);
    assert_eq!(output.text, source);

    let context = OperationContext::new().with_overwrite_on_downgrade(true);
    let project = operation::load_str(source, "/work/pom.xml", &context)
        .unwrap()
        .with_dependency(coordinate("g:a:1.0"))
        .build();
    let output = operation::modify(project).unwrap();
    assert!(output.text.contains("<version>1.0</version>"));
    assert_eq!(output.changes[0].reason, Reason::ForcedVersionReplacement);
}

#[test]
fn test_undefined_property_is_left_alone() {
    let source = "<project>\n  <dependencies>\n    <dependency>\n      <groupId>g</groupId>\n      <artifactId>a</artifactId>\n      <version>${missing.version}</version>\n    </dependency>\n  </dependencies>\n</project>\n";
    let output = run(source, &["g:a:9.9"]);

    assert_eq!(output.text, source);
    assert_eq!(output.changes[0].reason, Reason::UnresolvableVersion);
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        Warning::UnresolvablePlaceholder { placeholder, .. } if placeholder == "missing.version"
    )));
}

#[test]
fn test_invalid_entry_does_not_block_others() {
    let loaded = operation::load_str(SERVICE_POM, "/work/service/pom.xml", &OperationContext::new())
        .unwrap();
    let project = loaded
        .with_dependency(Coordinate::new("org.example", "", "1.0"))
        .with_dependency(coordinate("org.yaml:snakeyaml:2.2"))
        .build();
    let output = operation::modify(project).unwrap();

    assert_eq!(output.rejected.len(), 1);
    assert_eq!(output.changes.len(), 1);
    assert!(output.text.contains("<version>2.2</version><!-- pinned -->"));
}

#[test]
fn test_report_serializes_to_json() {
    let output = run(SERVICE_POM, &["org.yaml:snakeyaml:2.2"]);
    let json = serde_json::to_value(&output).unwrap();

    let change = &json["changes"][0];
    assert_eq!(change["outcome"], "upgraded");
    assert_eq!(change["from"], "1.33");
    assert_eq!(change["to"], "2.2");
    assert_eq!(change["reason"], "newer-version-requested");
    assert!(json.get("text").is_none());
}

#[test]
fn test_malformed_descriptor_is_fatal() {
    let fixture = PomFixture::new().unwrap();
    let path = fixture.write_pom("pom.xml", "<project><dependencies></project>").unwrap();
    assert!(operation::load(&path, &fixture.context()).is_err());
}

#[test]
fn test_prefixed_descriptor_gets_prefixed_entries() {
    let source = "<m:project xmlns:m=\"http://maven.apache.org/POM/4.0.0\">\n  <m:dependencies>\n    <m:dependency>\n      <m:groupId>g</m:groupId>\n      <m:artifactId>a</m:artifactId>\n      <m:version>1.0</m:version>\n    </m:dependency>\n  </m:dependencies>\n</m:project>\n";

    let output = run(source, &["g:b:1.0"]);
    assert!(matches!(output.changes[0].outcome, Outcome::Inserted));
    assert!(output.text.contains(
        "    <m:dependency>\n      <m:groupId>g</m:groupId>\n      <m:artifactId>b</m:artifactId>\n      <m:version>1.0</m:version>\n    </m:dependency>\n  </m:dependencies>"
    ));
    assert!(!output.text.contains("<dependency>"));

    let again = run(&output.text, &["g:b:1.0"]);
    assert!(!again.has_changes());
    assert_eq!(again.text, output.text);
}
