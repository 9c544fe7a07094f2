use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_serve() {
    Command::cargo_bin("protocolo")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help_shows_defaults() {
    Command::cargo_bin("protocolo")
        .expect("binary exists")
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("3000"));
}

#[test]
fn test_unknown_subcommand_fails() {
    Command::cargo_bin("protocolo")
        .expect("binary exists")
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_subcommand_fails() {
    Command::cargo_bin("protocolo")
        .expect("binary exists")
        .assert()
        .failure();
}
