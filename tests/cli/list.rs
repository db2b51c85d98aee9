use predicates::prelude::*;

use crate::support::{create_album, create_method, json_output, rubric, setup_store};

const PRIVATE_REQUEST: &str = r#"{
    "name": "Private",
    "creatorId": "user-2",
    "components": [
        { "type": "grade", "name": "Overall", "min": 0, "max": 10, "step": 1 }
    ]
}"#;

fn exercise_list(backend: &str) {
    let dir = setup_store(backend);
    let album = create_album(&dir);
    let private = create_method(&dir, PRIVATE_REQUEST);

    let all = json_output(dir.path(), &["list"]);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], private.as_str());
    assert_eq!(all[1]["id"], album.as_str());

    let public = json_output(dir.path(), &["list", "--public"]);
    assert_eq!(public.as_array().unwrap().len(), 1);
    assert_eq!(public[0]["id"], album.as_str());

    let mine = json_output(dir.path(), &["list", "--creator", "user-2"]);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["name"], "Private");
}

#[test]
fn test_list_relational() {
    exercise_list("relational");
}

#[test]
fn test_list_document() {
    exercise_list("document");
}

#[test]
fn test_list_empty() {
    let dir = setup_store("relational");

    rubric()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No grading methods found"));
}

#[test]
fn test_delete_removes_method() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted grading method"));

    let all = json_output(dir.path(), &["list"]);
    assert!(all.as_array().unwrap().is_empty());

    rubric()
        .current_dir(dir.path())
        .args(["delete", &id])
        .assert()
        .code(3);
}
