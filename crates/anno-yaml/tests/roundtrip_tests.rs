//! Round-trip and anchoring properties of the public API

use anno_yaml::{Document, Node};
use pretty_assertions::assert_eq;

/// Parse both texts with the external parser and compare structure.
fn assert_same_structure(a: &str, b: &str) {
    let va: serde_yaml::Value = serde_yaml::from_str(a).unwrap();
    let vb: serde_yaml::Value = serde_yaml::from_str(b).unwrap();
    assert_eq!(va, vb);
}

fn reload_render(text: &str) -> String {
    Document::from_text(text, "test.yaml").unwrap().to_text()
}

#[test]
fn test_round_trip_structural_identity() {
    let samples = [
        "name: demo\ncount: 3\nratio: 0.5\nflag: true\nempty: null\n",
        "outer:\n  inner:\n    leaf: value\n",
        "items:\n  - one\n  - two\n  - name: nested\n    size: 1\n",
        "text: |\n  first line\n  second line\n",
        "quoted: \"123\"\nplain: hello world\n",
    ];
    for text in samples {
        assert_same_structure(text, &reload_render(text));
    }
}

#[test]
fn test_render_load_idempotence() {
    let samples = [
        "# header\nname: demo\n\nitems:\n  - name: a\n  # second\n  - name: b\n\n# footer\n",
        "key: null\n\n\nother: 1\n",
        "# greeting comment\nhello: world\n",
        "outer:\n  # nested\n  inner: 1\n",
    ];
    for text in samples {
        let once = reload_render(text);
        let twice = reload_render(&once);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_scenario_greeting_comment() {
    let out = reload_render("# greeting comment\nhello: world\n");
    assert_eq!(out, "# greeting comment\nhello: world\n");
}

#[test]
fn test_scenario_blank_lines_between_entries() {
    let out = reload_render("key: null\n\n\nother: 1\n");
    assert_eq!(out, "key:\n\n\nother: 1\n");
}

#[test]
fn test_comment_renders_immediately_above_its_key() {
    let out = reload_render("first: 1\n# about second\nsecond: 2\n");
    let lines: Vec<_> = out.lines().collect();
    let comment_at = lines.iter().position(|l| *l == "# about second").unwrap();
    assert_eq!(lines[comment_at + 1], "second: 2");
}

#[test]
fn test_repeated_key_comment_stays_on_second_item() {
    let out = reload_render("items:\n  - name: a\n  # note\n  - name: b\n");
    let lines: Vec<_> = out.lines().collect();
    let comment_at = lines.iter().position(|l| l.trim() == "# note").unwrap();
    assert_eq!(lines[comment_at + 1].trim(), "- name: b");
    assert!(lines[..comment_at].iter().any(|l| l.trim() == "- name: a"));
}

#[test]
fn test_blank_run_count_preserved() {
    for n in 1..=4 {
        let text = format!("a: 1\n{}b: 2\n", "\n".repeat(n));
        let out = reload_render(&text);
        let blanks = out.lines().filter(|l| l.trim().is_empty()).count();
        assert_eq!(blanks, n, "expected {n} blank lines to survive");
    }
}

#[test]
fn test_comments_preserved_across_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "# top comment\nname: first\n\nother: 2\n").unwrap();

    let mut doc = Document::load(&path).unwrap();
    doc.set("new_key", "v");
    doc.save().unwrap();

    let reloaded = Document::load(&path).unwrap();
    assert_eq!(reloaded.get("new_key").and_then(Node::as_str), Some("v"));
    let text = reloaded.to_text();
    assert!(text.contains("# top comment"));
    assert!(text.contains("\n\nother: 2"));
}

#[test]
fn test_comment_only_document_round_trips() {
    let doc = Document::from_text("# floating\n", "test.yaml").unwrap();
    assert_eq!(doc.to_text(), "# floating\n");
}

#[test]
fn test_unanchored_comment_drops_without_error() {
    // Two runs compete for the same anchor; the first wins and the
    // second is dropped, best-effort rather than an error
    let out = reload_render("# a\n\n# b\nkey: 1\n");
    assert!(out.contains("# a"));
    assert!(!out.contains("# b"));
    assert!(out.contains("key: 1"));
}

#[test]
fn test_block_scalar_round_trip() {
    let text = "description: |\n  line one\n  line two\n";
    let out = reload_render(text);
    assert_eq!(out, text);
    assert_same_structure(text, &out);
}
