// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `ploy init`, `ploy create`, and target lifecycle
//! commands.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ploy() -> Command {
    cargo_bin_cmd!("ploy")
}

fn db_arg(temp: &TempDir) -> String {
    temp.path().join("ploy.db").display().to_string()
}

#[test]
fn init_creates_database() {
    let temp = TempDir::new().unwrap();

    ploy()
        .args(["--db", &db_arg(&temp), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized database"));

    assert!(temp.path().join("ploy.db").exists());
}

#[test]
fn init_is_idempotent() {
    let temp = TempDir::new().unwrap();

    ploy().args(["--db", &db_arg(&temp), "init"]).assert().success();
    ploy().args(["--db", &db_arg(&temp), "init"]).assert().success();
}

#[test]
fn create_then_list_shows_the_target() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy()
        .args([
            "--db", &db, "create", "site", "-k", "s3cr3t", "-d", "main site", "--", "git",
            "pull",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("created target site"));

    ploy()
        .args(["--db", &db, "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site"))
        .stdout(predicate::str::contains("main site"))
        .stdout(predicate::str::contains("git pull"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("refs/heads/deploy"));
}

#[test]
fn targets_output_never_reveals_the_key() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy()
        .args(["--db", &db, "create", "site", "-k", "super-secret-key", "--", "true"])
        .assert()
        .success();

    ploy()
        .args(["--db", &db, "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("super-secret-key").not());
}

#[test]
fn create_requires_a_command() {
    let temp = TempDir::new().unwrap();

    ploy()
        .args(["--db", &db_arg(&temp), "create", "site", "-k", "s3cr3t"])
        .assert()
        .failure();
}

#[test]
fn create_rejects_empty_key() {
    let temp = TempDir::new().unwrap();

    ploy()
        .args(["--db", &db_arg(&temp), "create", "site", "-k", "", "--", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key must not be empty"));
}

#[test]
fn create_rejects_duplicate_id() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy()
        .args(["--db", &db, "create", "site", "-k", "s3cr3t", "--", "true"])
        .assert()
        .success();

    ploy()
        .args(["--db", &db, "create", "site", "-k", "other", "--", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn disable_and_enable_cycle() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy()
        .args(["--db", &db, "create", "site", "-k", "s3cr3t", "--", "true"])
        .assert()
        .success();

    ploy()
        .args(["--db", &db, "disable", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled target site"));

    ploy()
        .args(["--db", &db, "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no"));

    ploy()
        .args(["--db", &db, "enable", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled target site"));
}

#[test]
fn enable_unknown_target_fails() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy().args(["--db", &db, "init"]).assert().success();

    ploy()
        .args(["--db", &db, "enable", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target not found"));
}

#[test]
fn delete_removes_from_listing() {
    let temp = TempDir::new().unwrap();
    let db = db_arg(&temp);

    ploy()
        .args(["--db", &db, "create", "site", "-k", "s3cr3t", "--", "true"])
        .assert()
        .success();

    ploy()
        .args(["--db", &db, "delete", "site"])
        .assert()
        .success();

    ploy()
        .args(["--db", &db, "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no targets registered"));
}
