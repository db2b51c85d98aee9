use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use tempfile::TempDir;

/// Album rubric: 1..10 lyrics plus a production block of two 0..5 grades
pub const ALBUM_REQUEST: &str = r#"{
    "name": "Album",
    "creatorId": "user-1",
    "isPublic": true,
    "components": [
        { "type": "grade", "name": "Lyrics", "min": 0, "max": 10, "step": 1,
          "description": "Words and delivery" },
        { "type": "block", "name": "Production", "subComponents": [
            { "type": "grade", "name": "Mixing", "min": 0, "max": 5, "step": 0.5 },
            { "type": "grade", "name": "Mastering", "min": 0, "max": 5, "step": 0.5 }
        ], "actions": ["ADD"] }
    ],
    "actions": ["ADD"]
}"#;

/// Get a Command for rubric, isolated from the caller's environment
pub fn rubric() -> Command {
    let mut cmd = cargo_bin_cmd!("rubric");
    cmd.env_remove("RUBRIC_STORE")
        .env_remove("RUBRIC_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Initialize a store with the given backend in a fresh directory
pub fn setup_store(backend: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    rubric()
        .current_dir(dir.path())
        .args(["init", "--backend", backend])
        .assert()
        .success();
    dir
}

/// Write a request file into the directory and return its path
pub fn write_request(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Create the album method and return its id
pub fn create_album(dir: &TempDir) -> String {
    create_method(dir, ALBUM_REQUEST)
}

/// Create a method from request text and return its id
pub fn create_method(dir: &TempDir, request: &str) -> String {
    let output = rubric()
        .current_dir(dir.path())
        .args(["--quiet", "create", "-"])
        .write_stdin(request)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Run a command expected to succeed with JSON output and parse stdout
pub fn json_output(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = rubric()
        .current_dir(dir)
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
