use assert_cmd::Command;
use pomup_cli::test_utils::{PomFixture, pom_xml};
use predicates::prelude::*;

const BODY: &str = "    <dependencies>\n        <dependency>\n            <groupId>org.example</groupId>\n            <artifactId>lib</artifactId>\n            <version>1.0</version>\n        </dependency>\n    </dependencies>\n";

/// A `pomup` command isolated from the user's home directory and configuration.
fn pomup(fixture: &PomFixture) -> Command {
    let mut cmd = Command::cargo_bin("pomup").unwrap();
    cmd.current_dir(fixture.root())
        .env("HOME", fixture.root())
        .env_remove("POMUP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn project() -> PomFixture {
    let fixture = PomFixture::new().unwrap();
    fixture.write_pom("pom.xml", &pom_xml("org.example", "app", "1.0.0", None, BODY)).unwrap();
    fixture
}

#[test]
fn test_add_without_write_is_a_dry_run() {
    let fixture = project();
    let before = fixture.read("pom.xml").unwrap();

    pomup(&fixture)
        .args(["add", "org.example:lib:2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("upgraded org.example:lib 1.0 -> 2.0"))
        .stdout(predicate::str::contains("pass --write"));

    assert_eq!(fixture.read("pom.xml").unwrap(), before);
}

#[test]
fn test_add_write_then_check_passes() {
    let fixture = project();
    let before = fixture.read("pom.xml").unwrap();

    pomup(&fixture)
        .args([
            "add",
            "--pom",
            "pom.xml",
            "org.example:lib:2.0",
            "org.example:extra:0.3@test",
            "--write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("inserted org.example:extra:0.3"));

    let after = fixture.read("pom.xml").unwrap();
    assert!(after.starts_with(&before[..before.find("<version>1.0</version>").unwrap()]));
    assert!(after.contains("<version>2.0</version>"));
    assert!(after.contains("            <scope>test</scope>\n"));

    pomup(&fixture)
        .args(["check", "org.example:lib:2.0", "org.example:extra:0.3@test"])
        .assert()
        .success();
}

#[test]
fn test_check_fails_when_changes_are_pending() {
    let fixture = project();

    pomup(&fixture)
        .args(["check", "org.example:lib:1.5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("needs updating"))
        .stderr(predicate::str::contains("pomup add --write"));
}

#[test]
fn test_check_passes_for_older_request() {
    let fixture = project();

    pomup(&fixture)
        .args(["check", "org.example:lib:0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already satisfied"));
}

#[test]
fn test_json_report() {
    let fixture = project();

    let output = pomup(&fixture).args(["add", "--json", "org.example:lib:2.0"]).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changes"][0]["outcome"], "upgraded");
    assert_eq!(report["changes"][0]["to"], "2.0");
    assert!(report["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_malformed_coordinate_is_a_usage_error() {
    let fixture = project();

    pomup(&fixture)
        .args(["add", "org.example:lib"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("groupId:artifactId"));
}

#[test]
fn test_missing_descriptor() {
    let fixture = PomFixture::new().unwrap();

    pomup(&fixture)
        .args(["add", "--pom", "absent/pom.xml", "org.example:lib:2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Descriptor not found"));
}

#[test]
fn test_config_file_supplies_lookup_roots() {
    let fixture = PomFixture::new().unwrap();
    let managed = "    <packaging>pom</packaging>\n    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>org.example</groupId>\n                <artifactId>lib</artifactId>\n                <version>3.0</version>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n";
    fixture
        .install_pom(
            "org.example",
            "parent",
            "1",
            &pom_xml("org.example", "parent", "1", None, managed),
        )
        .unwrap();
    fixture
        .write_pom(
            "app/pom.xml",
            &pom_xml("org.example", "app", "1", Some(("org.example", "parent", "1")), ""),
        )
        .unwrap();
    let config = fixture.root().join("pomup.toml");
    std::fs::write(
        &config,
        format!("lookup-roots = [{:?}]\n", fixture.repository().display().to_string()),
    )
    .unwrap();

    pomup(&fixture)
        .args([
            "--config",
            config.to_str().unwrap(),
            "check",
            "--pom",
            "app/pom.xml",
            "org.example:lib:2.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("covered by dependency management"));

    pomup(&fixture)
        .args(["check", "--pom", "app/pom.xml", "org.example:lib:2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs updating"));
}
