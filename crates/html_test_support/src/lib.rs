//! Shared helpers for integration tests: fixture manifests, document setup, line diffs.

use html::{Dom, Id, parse_markup_to_element};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const FIXTURE_FORMAT_V1: &str = "fixture-v1";

#[derive(Deserialize)]
struct Manifest<T> {
    format: String,
    cases: Vec<T>,
}

/// Resolves `name` under the calling crate's `tests/fixtures` directory.
pub fn fixture_path(manifest_dir: &str, name: &str) -> PathBuf {
    Path::new(manifest_dir).join("tests").join("fixtures").join(name)
}

/// Loads the `cases` of a TOML or JSON fixture manifest, chosen by file extension.
///
/// Panics with the path in the message on unreadable files, parse errors, unknown formats
/// and empty case lists.
pub fn load_cases<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    let manifest: Manifest<T> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture TOML {path:?}: {err}")),
        Some("json") => serde_json::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture JSON {path:?}: {err}")),
        other => panic!("unsupported fixture extension {other:?} for {path:?}"),
    };
    assert_eq!(
        manifest.format, FIXTURE_FORMAT_V1,
        "unsupported fixture format in {path:?}"
    );
    assert!(!manifest.cases.is_empty(), "fixture {path:?} has no cases");
    manifest.cases
}

/// Parses `markup` (one root element) and attaches it under the document node.
pub fn document(markup: &str) -> (Dom, Id) {
    let mut dom = Dom::new();
    let root = parse_markup_to_element(&mut dom, markup)
        .unwrap_or_else(|err| panic!("failed to parse test markup: {err}\n{markup}"));
    let doc = dom.document();
    dom.append_child(doc, root)
        .unwrap_or_else(|err| panic!("failed to attach test markup: {err}"));
    (dom, root)
}

/// The element at or below `root` with `id="{id}"`.
pub fn by_id(dom: &Dom, root: Id, id: &str) -> Id {
    dom.find_by_attr(root, "id", id)
        .unwrap_or_else(|| panic!("no element with id={id:?}"))
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    use std::fmt::Write;
    let mut mismatch = None;
    let missing = "<missing>";
    for i in 0..max {
        let left = expected.get(i).map(String::as_str).unwrap_or(missing);
        let right = actual.get(i).map(String::as_str).unwrap_or(missing);
        if left != right {
            mismatch = Some(i);
            break;
        }
    }
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Asserts two line lists are equal, printing a focused diff otherwise.
pub fn assert_lines_eq(label: &str, expected: &[String], actual: &[String]) {
    if expected != actual {
        panic!("{label} mismatch\n{}", diff_lines(expected, actual));
    }
}
