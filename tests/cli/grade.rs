use predicates::prelude::*;

use crate::support::{create_album, json_output, rubric, setup_store, write_request};

#[test]
fn test_grade_all_leaves() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args([
            "grade",
            &id,
            "Lyrics=8",
            "Production.Mixing=4.5",
            "production.mastering=4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 3 value(s) to Album"))
        .stdout(predicate::str::contains("16.5 of 20"))
        .stdout(predicate::str::contains("82.5%"))
        .stdout(predicate::str::contains("4/5 stars"));
}

#[test]
fn test_grade_persists_values() {
    let dir = setup_store("document");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args(["grade", &id, "Lyrics=8", "Production.Mixing=4.5", "Production.Mastering=4"])
        .assert()
        .success();

    let view = json_output(dir.path(), &["show", &id]);
    assert_eq!(view["value"], 16.5);
    assert_eq!(view["normalized"], 8.25);
    assert_eq!(view["components"][0]["value"], 8.0);

    let template = json_output(dir.path(), &["show", &id, "--template"]);
    assert!(template.get("value").is_none());
}

#[test]
fn test_grade_json_outcome() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    let output = json_output(
        dir.path(),
        &["grade", &id, "Lyrics=8", "Production.Mixing=4.5", "Production.Mastering=4"],
    );
    assert_eq!(output["success"], true);
    assert_eq!(output["outcome"]["applied"].as_array().unwrap().len(), 3);
    assert_eq!(output["method"]["value"], 16.5);
}

#[test]
fn test_partial_grading_reports_and_persists() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args(["grade", &id, "Lyrics=8", "Production.Mixing=9", "Vocals=3"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("not graded: Production.Mastering"))
        .stdout(predicate::str::contains("unused input: Vocals=3"))
        .stdout(predicate::str::contains("rejected: Production.Mixing=9"))
        .stderr(predicate::str::contains("grading incomplete"));

    let view = json_output(dir.path(), &["show", &id]);
    assert_eq!(view["components"][0]["value"], 8.0);
    assert!(view["components"][1]["components"][0].get("value").is_none());
}

#[test]
fn test_grade_from_inputs_file() {
    let dir = setup_store("relational");
    let id = create_album(&dir);
    let inputs = write_request(
        &dir,
        "inputs.json",
        r#"{ "inputs": [
            { "path": "Lyrics", "value": 10 },
            { "path": "Production.Mixing", "value": 5 },
            { "path": "Production.Mastering", "value": 5 }
        ] }"#,
    );

    let output = json_output(
        dir.path(),
        &["grade", &id, "--inputs", inputs.to_str().unwrap()],
    );
    assert_eq!(output["success"], true);
    assert_eq!(output["method"]["normalized"], 10.0);
}

#[test]
fn test_grade_rejects_malformed_value() {
    let dir = setup_store("relational");
    let id = create_album(&dir);

    rubric()
        .current_dir(dir.path())
        .args(["grade", &id, "Lyrics"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PATH=VALUE"));
}
