use binding::{BindingConfig, ResolutionError, resolve_model_directive};
use html_test_support::{assert_lines_eq, by_id, document, fixture_path, load_cases};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PathCase {
    name: String,
    markup: String,
    #[serde(default = "fallback_default")]
    fallback: bool,
    expected: Option<String>,
    error: Option<String>,
}

fn fallback_default() -> bool {
    true
}

fn describe(result: Result<String, ResolutionError>) -> String {
    match result {
        Ok(path) => format!("path {path}"),
        Err(ResolutionError::MissingModel { .. }) => "error missing".to_string(),
        Err(ResolutionError::ArgumentsNotSupported { .. }) => "error arguments".to_string(),
        Err(ResolutionError::MalformedDirective { .. }) => "error malformed".to_string(),
        Err(other) => format!("error other: {other}"),
    }
}

#[test]
fn model_paths_fixture() {
    let cases: Vec<PathCase> =
        load_cases(&fixture_path(env!("CARGO_MANIFEST_DIR"), "model_paths.toml"));
    let config = BindingConfig::default();

    let mut expected = Vec::new();
    let mut actual = Vec::new();
    for case in &cases {
        let want = match (&case.expected, &case.error) {
            (Some(path), None) => format!("path {path}"),
            (None, Some(kind)) => format!("error {kind}"),
            _ => panic!("case {} needs exactly one of expected/error", case.name),
        };
        expected.push(format!("{}: {want}", case.name));

        let (dom, root) = document(&case.markup);
        let target = by_id(&dom, root, "target");
        let got = resolve_model_directive(&dom, target, case.fallback, &config)
            .map(|directive| directive.action);
        actual.push(format!("{}: {}", case.name, describe(got)));
    }
    assert_lines_eq("model paths", &expected, &actual);
}

#[test]
fn missing_model_message_names_the_element() {
    let (dom, root) =
        document(r#"<div class="foo">Name: <input id="target" name="user[firstName]"></div>"#);
    let target = by_id(&dom, root, "target");
    let err = resolve_model_directive(&dom, target, true, &BindingConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Cannot determine the model name"), "{message}");
    assert!(
        message.contains(r#"<input id="target" name="user[firstName]">"#),
        "{message}"
    );
}

#[test]
fn configured_wildcard_is_used() {
    let config = BindingConfig::from_toml_str(
        r#"
        model_attribute = "data-bind"
        wildcard = "all"
        "#,
    )
    .unwrap();
    let (dom, root) = document(r#"<form data-bind="all"><input id="target" name="a[b]"></form>"#);
    let target = by_id(&dom, root, "target");
    let directive = resolve_model_directive(&dom, target, true, &config).unwrap();
    assert_eq!(directive.action, "a.b");

    let (dom, root) = document(r#"<form data-bind="*"><input id="target" name="a"></form>"#);
    let target = by_id(&dom, root, "target");
    assert!(resolve_model_directive(&dom, target, true, &config).is_err());
}
