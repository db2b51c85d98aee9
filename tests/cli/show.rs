use predicates::prelude::*;

use crate::support::{create_album, rubric, setup_store, ALBUM_REQUEST};

#[test]
fn test_show_template_tree() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args(["show", &id, "--template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Album  by user-1  (public)"))
        .stdout(predicate::str::contains("Lyrics  - [0..10] step 1"))
        .stdout(predicate::str::contains("Words and delivery"))
        .stdout(predicate::str::contains("+ Production  [0..10]"))
        .stdout(predicate::str::contains("+ Mastering"));
}

#[test]
fn test_export_is_document_form() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    let output = rubric()
        .current_dir(dir.path())
        .args(["export", &id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["id"], id.as_str());
    assert_eq!(doc["components"][0]["kind"], "grade");
    assert_eq!(doc["components"][1]["kind"], "block");
    assert_eq!(doc["components"][1]["actions"][0], "ADD");
    assert_eq!(doc["actions"][0], "ADD");

    let request: serde_json::Value = serde_json::from_str(ALBUM_REQUEST).unwrap();
    assert_eq!(doc["name"], request["name"]);
}
