// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `ploy deployments`.
//!
//! Deployment rows are written by the daemon, so these specs seed them
//! through ploy-core directly.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use chrono::Utc;
use ploy_core::{Database, Deployment, LaunchErrorKind, Outcome};
use predicates::prelude::*;
use tempfile::TempDir;

fn ploy() -> Command {
    cargo_bin_cmd!("ploy")
}

fn seed(db: &Database, target_id: &str, outcome: Outcome) -> i64 {
    db.save_deployment(&Deployment::new(target_id.into(), Utc::now(), outcome))
        .unwrap()
}

fn completed(status: i32) -> Outcome {
    Outcome::Completed {
        status,
        stdout: String::new(),
        stderr: String::new(),
        elapsed: Duration::from_millis(15),
    }
}

#[test]
fn empty_database_prints_notice() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ploy.db");
    Database::open(&db_path).unwrap();

    ploy()
        .args(["--db", &db_path.display().to_string(), "deployments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no deployments recorded"));
}

#[test]
fn lists_outcomes_newest_first() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ploy.db");
    let db = Database::open(&db_path).unwrap();

    seed(&db, "site", completed(0));
    seed(
        &db,
        "site",
        Outcome::TimedOut {
            elapsed: Duration::from_millis(1500),
            timeout: Duration::from_secs(1),
        },
    );
    seed(
        &db,
        "site",
        Outcome::LaunchFailed {
            kind: LaunchErrorKind::Os,
            message: "operating system error: enoent".into(),
        },
    );
    drop(db);

    let output = ploy()
        .args(["--db", &db_path.display().to_string(), "deployments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"))
        .stdout(predicate::str::contains("timed out"))
        .stdout(predicate::str::contains("launch error"))
        .get_output()
        .stdout
        .clone();

    // Newest (launch error) listed before oldest (ok).
    let text = String::from_utf8(output).unwrap();
    let launch = text.find("launch error").unwrap();
    let ok_row = text.find("ok").unwrap();
    assert!(launch < ok_row);
}

#[test]
fn respects_limit() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ploy.db");
    let db = Database::open(&db_path).unwrap();

    for _ in 0..5 {
        seed(&db, "site", completed(0));
    }
    drop(db);

    let output = ploy()
        .args(["--db", &db_path.display().to_string(), "deployments", "-n", "2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    // Header plus two rows.
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn filters_by_target() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ploy.db");
    let db = Database::open(&db_path).unwrap();

    seed(&db, "site", completed(0));
    seed(&db, "docs", completed(1));
    drop(db);

    ploy()
        .args([
            "--db",
            &db_path.display().to_string(),
            "deployments",
            "--target",
            "docs",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs"))
        .stdout(predicate::str::contains("site").not());
}
