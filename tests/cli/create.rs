use predicates::prelude::*;

use crate::support::{
    create_album, json_output, rubric, setup_store, write_request, ALBUM_REQUEST,
};

#[test]
fn test_create_from_file() {
    let dir = setup_store("relational");
    let request = write_request(&dir, "album.json", ALBUM_REQUEST);

    rubric()
        .current_dir(dir.path())
        .arg("create")
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created grading method"))
        .stdout(predicate::str::contains("range 0..20"));
}

#[test]
fn test_create_from_stdin_quiet_prints_id() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    assert_eq!(id.len(), 36);
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[test]
fn test_create_json_output() {
    let dir = setup_store("document");
    let request = write_request(&dir, "album.json", ALBUM_REQUEST);

    let view = json_output(dir.path(), &["create", request.to_str().unwrap()]);
    assert_eq!(view["name"], "Album");
    assert_eq!(view["creator_id"], "user-1");
    assert_eq!(view["min"], 0.0);
    assert_eq!(view["max"], 20.0);
    assert_eq!(view["components"][1]["components"][0]["name"], "Mixing");

    let id = view["id"].as_str().unwrap();
    assert!(dir
        .path()
        .join(".rubric/methods")
        .join(format!("{}.json", id))
        .exists());
}

#[test]
fn test_update_keeps_identity() {
    let dir = setup_store("relational");
    let id = create_album(&dir);
    let replacement = r#"{
        "name": "Album (short)",
        "creatorId": "someone-else",
        "components": [
            { "type": "grade", "name": "Overall", "min": 0, "max": 100, "step": 1 }
        ]
    }"#;
    let request = write_request(&dir, "short.json", replacement);

    let view = json_output(dir.path(), &["update", &id, request.to_str().unwrap()]);
    assert_eq!(view["id"], id.as_str());
    assert_eq!(view["name"], "Album (short)");
    assert_eq!(view["creator_id"], "user-1");
    assert_eq!(view["is_public"], false);
    assert_eq!(view["components"].as_array().unwrap().len(), 1);
}
