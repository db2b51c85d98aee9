use predicates::prelude::*;
use tempfile::tempdir;

use crate::support::{json_output, rubric, setup_store};

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();

    rubric()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("relational backend"));

    assert!(dir.path().join(".rubric/config.toml").exists());
    assert!(dir.path().join(".rubric/rubric.db").exists());
}

#[test]
fn test_init_document_backend() {
    let dir = setup_store("document");

    let config = std::fs::read_to_string(dir.path().join(".rubric/config.toml")).unwrap();
    assert!(config.contains("backend = \"document\""));
    assert!(dir.path().join(".rubric/methods").is_dir());
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_store("document");

    let output = json_output(dir.path(), &["init"]);
    assert_eq!(output["status"], "ok");
    assert_eq!(output["backend"], "document");
}

#[test]
fn test_init_explicit_store_path() {
    let dir = tempdir().unwrap();

    rubric()
        .current_dir(dir.path())
        .args(["--store", "data/rubrics", "init"])
        .assert()
        .success();

    assert!(dir.path().join("data/rubrics/config.toml").exists());
}

#[test]
fn test_init_rejects_unknown_backend() {
    let dir = tempdir().unwrap();

    rubric()
        .current_dir(dir.path())
        .args(["init", "--backend", "mongo"])
        .assert()
        .code(2);
}
