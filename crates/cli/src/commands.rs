// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations.
//!
//! Each function opens the database, performs one administrative
//! operation, and prints a short confirmation or a table.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;

use ploy_core::{Database, Result, Target};

use crate::display;

/// Arguments for registering a target.
pub struct CreateTarget {
    pub id: String,
    pub key: String,
    pub description: Option<String>,
    pub events: Vec<String>,
    pub refs: Vec<String>,
    pub timeout: Option<u64>,
    pub disabled: bool,
    pub args: Vec<String>,
}

/// Create or migrate the database schema.
pub fn init(db_path: &Path) -> Result<()> {
    Database::open(db_path)?;
    println!("initialized database at {}", db_path.display());
    Ok(())
}

/// Register a new target.
pub fn create(db_path: &Path, spec: CreateTarget) -> Result<()> {
    let mut target = Target::new(
        spec.id,
        spec.key,
        spec.events.into_iter().collect(),
        spec.refs.into_iter().collect(),
        spec.args,
        spec.timeout.map(Duration::from_secs),
        Utc::now(),
    )?;
    target.description = spec.description;
    target.enabled = !spec.disabled;

    let db = Database::open(db_path)?;
    db.create_target(&target)?;

    if target.enabled {
        println!("created target {}", target.id);
    } else {
        println!("created target {} (disabled)", target.id);
    }
    Ok(())
}

/// Print the target table.
pub fn targets(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let targets = db.list_targets()?;

    if targets.is_empty() {
        println!("no targets registered");
        return Ok(());
    }

    print!("{}", display::format_targets(&targets));
    Ok(())
}

/// Print the deployment table.
pub fn deployments(db_path: &Path, limit: usize, target: Option<&str>) -> Result<()> {
    let db = Database::open(db_path)?;
    let deployments = db.list_deployments(limit, target)?;

    if deployments.is_empty() {
        println!("no deployments recorded");
        return Ok(());
    }

    print!("{}", display::format_deployments(&deployments));
    Ok(())
}

/// Enable or disable a target.
pub fn set_enabled(db_path: &Path, id: &str, enabled: bool) -> Result<()> {
    let db = Database::open(db_path)?;
    db.set_target_enabled(id, enabled)?;

    if enabled {
        println!("enabled target {}", id);
    } else {
        println!("disabled target {}", id);
    }
    Ok(())
}

/// Delete a target, keeping its deployment history.
pub fn delete(db_path: &Path, id: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    db.delete_target(id)?;

    println!("deleted target {}", id);
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
