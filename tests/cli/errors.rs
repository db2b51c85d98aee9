use std::fs;

use predicates::prelude::*;
use tempfile::tempdir;

use crate::support::{create_album, rubric, setup_store, write_request};

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

#[test]
fn test_missing_store() {
    let dir = tempdir().unwrap();

    rubric()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"store_not_found\""));
}

#[test]
fn test_unknown_method() {
    let dir = setup_store("relational");

    rubric()
        .current_dir(dir.path())
        .args(["show", MISSING_ID])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_method_id() {
    let dir = setup_store("relational");

    rubric()
        .current_dir(dir.path())
        .args(["--format", "json", "show", "not-a-uuid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"usage_error\""));
}

#[test]
fn test_unsupported_component_type() {
    let dir = setup_store("relational");
    let request = write_request(
        &dir,
        "bad.json",
        r#"{
            "name": "Bad",
            "creatorId": "user-1",
            "components": [ { "type": "slider", "name": "Volume" } ]
        }"#,
    );

    rubric()
        .current_dir(dir.path())
        .args(["--format", "json", "create"])
        .arg(&request)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"unsupported_component_type\""));
}

#[test]
fn test_action_count_mismatch() {
    let dir = setup_store("document");
    let request = write_request(
        &dir,
        "bad.json",
        r#"{
            "name": "Bad",
            "creatorId": "user-1",
            "components": [
                { "type": "grade", "name": "A", "min": 0, "max": 1, "step": 1 },
                { "type": "grade", "name": "B", "min": 0, "max": 1, "step": 1 }
            ]
        }"#,
    );

    rubric()
        .current_dir(dir.path())
        .args(["--format", "json", "create"])
        .arg(&request)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"action_count_mismatch\""));
}

#[test]
fn test_malformed_request() {
    let dir = setup_store("relational");

    rubric()
        .current_dir(dir.path())
        .args(["create", "-"])
        .write_stdin("{ not json")
        .assert()
        .code(2);
}

#[test]
fn test_corrupt_document_is_integrity_error() {
    let dir = setup_store("document");
    let id = create_album(&dir);
    let path = dir.path().join(".rubric/methods").join(format!("{}.json", id));
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("\"grade\"", "\"slider\"")).unwrap();

    rubric()
        .current_dir(dir.path())
        .args(["--format", "json", "show", &id])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("\"structural_integrity\""));
}

#[test]
fn test_corrupt_database_rows_are_integrity_error() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    let conn = rusqlite::Connection::open(dir.path().join(".rubric/rubric.db")).unwrap();
    conn.execute("DELETE FROM grades WHERE name = 'Lyrics'", [])
        .unwrap();
    drop(conn);

    rubric()
        .current_dir(dir.path())
        .args(["show", &id])
        .assert()
        .code(4);
}
