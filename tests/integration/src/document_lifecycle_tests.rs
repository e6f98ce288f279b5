//! End-to-end document lifecycle: load from disk, edit, save, reload

use anno_yaml::{CommentOptions, Document, Mapping, Node, Sequence};
use pretty_assertions::assert_eq;

const FIXTURE: &str = "\
# Service configuration
name: demo-service
port: 8080

# Hosts the service binds to
hosts:
  - localhost
  - 0.0.0.0

limits:
  # requests per second
  rate: 100
  burst: 20
";

fn write_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("service.yaml");
    std::fs::write(&path, FIXTURE).unwrap();
    path
}

#[test]
fn test_load_reflects_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get("name").and_then(Node::as_str), Some("demo-service"));
    assert_eq!(doc.get("port").and_then(Node::as_i64), Some(8080));

    let limits = doc.get("limits").and_then(Node::as_mapping).unwrap();
    assert_eq!(limits.get("rate").and_then(Node::as_i64), Some(100));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Document::load(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(anno_yaml::Error::Fs(_))));
}

#[test]
fn test_save_preserves_unmodified_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let doc = Document::load(&path).unwrap();
    let saved = doc.save().unwrap();

    assert!(saved.contains("# Service configuration"));
    assert!(saved.contains("# Hosts the service binds to"));
    assert!(saved.contains("# requests per second"));
    assert!(saved.contains("port: 8080\n\n"));
    assert_eq!(saved, anno_fs::read_text(&path).unwrap());
}

#[test]
fn test_edit_save_reload_keeps_comments_and_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let mut doc = Document::load(&path).unwrap();
    doc.set("port", 9090i64);
    doc.set("new_key", "v");
    doc.save().unwrap();

    let reloaded = Document::load(&path).unwrap();
    assert_eq!(reloaded.get("port").and_then(Node::as_i64), Some(9090));
    assert_eq!(reloaded.get("new_key").and_then(Node::as_str), Some("v"));

    let text = reloaded.to_text();
    assert!(text.contains("# Service configuration"));
    assert!(text.contains("# requests per second"));
}

#[test]
fn test_structural_content_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let doc = Document::load(&path).unwrap();
    let rendered = doc.to_text();

    let before: serde_yaml::Value = serde_yaml::from_str(FIXTURE).unwrap();
    let after: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_subtree_replacement_and_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let mut doc = Document::load(&path).unwrap();

    let mut replacement = Sequence::new();
    replacement.push("127.0.0.1");
    doc.set("hosts", replacement);

    doc.add_comment("added by test", CommentOptions::default());
    doc.add_break_line(1).unwrap();

    let mut extra = Mapping::new();
    extra.insert("enabled", true);
    doc.set("features", extra);

    let saved = doc.save().unwrap();
    assert!(saved.contains("hosts:\n  - 127.0.0.1\n"));
    assert!(saved.contains("# added by test"));
    assert!(saved.ends_with("features:\n  enabled: true\n"));

    let reloaded = Document::load(&path).unwrap();
    let features = reloaded.get("features").and_then(Node::as_mapping).unwrap();
    assert_eq!(features.get("enabled").and_then(Node::as_bool), Some(true));
}

#[test]
fn test_no_transient_siblings_left_after_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);

    let doc = Document::load(&path).unwrap();
    doc.save().unwrap();

    assert!(!dir.path().join("service.yaml.tmp").exists());
    assert!(!dir.path().join("service.yaml.bak").exists());
}
