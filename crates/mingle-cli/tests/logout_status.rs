use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn seed_tokens(home: &Path) {
    let stored = serde_json::json!({
        "accessToken": "a-long-access-token-value",
        "refreshToken": "a-long-refresh-token-value",
        "savedAt": "2026-08-25T12:00:00Z",
    });
    fs::write(
        home.join("tokens.json"),
        serde_json::to_string(&stored).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_status_not_signed_in() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("mingle")
        .env("MINGLE_HOME", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_status_masks_tokens() {
    let dir = tempdir().unwrap();
    seed_tokens(dir.path());

    cargo_bin_cmd!("mingle")
        .env("MINGLE_HOME", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in since 2026-08-25"))
        .stdout(predicate::str::contains("a-long-acces..."))
        .stdout(predicate::str::contains("a-long-refre..."))
        .stdout(predicate::str::contains("a-long-access-token-value").not());
}

#[test]
fn test_logout_clears_store() {
    let dir = tempdir().unwrap();
    seed_tokens(dir.path());

    cargo_bin_cmd!("mingle")
        .env("MINGLE_HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));

    assert!(!dir.path().join("tokens.json").exists());

    cargo_bin_cmd!("mingle")
        .env("MINGLE_HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}
