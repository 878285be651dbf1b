use pomup_cli::operation;
use pomup_cli::pom::Coordinate;
use pomup_cli::test_utils::{PomFixture, pom_xml};
use std::thread;

#[test]
fn test_distinct_descriptors_in_parallel() {
    let fixture = PomFixture::new().unwrap();
    let paths: Vec<_> = (0..8)
        .map(|i| {
            let body = format!(
                "    <dependencies>\n        <dependency>\n            <groupId>org.example</groupId>\n            <artifactId>lib</artifactId>\n            <version>1.{i}</version>\n        </dependency>\n    </dependencies>\n"
            );
            fixture
                .write_pom(
                    format!("module-{i}/pom.xml"),
                    &pom_xml("org.example", &format!("module-{i}"), "1.0", None, &body),
                )
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let context = fixture.context();
            thread::spawn(move || {
                let project = operation::load(&path, &context)
                    .unwrap()
                    .with_dependency(Coordinate::new("org.example", "lib", "1.5"))
                    .build();
                operation::modify(project).unwrap()
            })
        })
        .collect();

    let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs.len(), 8);
    for (i, output) in outputs.iter().enumerate() {
        let expected = if i < 5 { "1.5".to_string() } else { format!("1.{i}") };
        assert!(
            output.text.contains(&format!("<version>{expected}</version>")),
            "module-{i}: {}",
            output.text
        );
        assert_eq!(output.has_changes(), i < 5);
    }
}
