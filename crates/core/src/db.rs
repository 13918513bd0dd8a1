// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed storage for targets and deployments.
//!
//! The [`Database`] struct provides all data access operations. Targets are
//! the registered triggers; deployments are append-only audit records of
//! execution attempts. Deployments reference their target by id without a
//! foreign key so the audit trail survives target deletion.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::deployment::{Deployment, Outcome};
use crate::error::{Error, Result};
use crate::target::Target;

/// SQL schema for the ploy database.
pub const SCHEMA: &str = r#"
-- Registered deployment triggers
CREATE TABLE IF NOT EXISTS targets (
    id TEXT PRIMARY KEY,
    description TEXT,
    enabled INTEGER NOT NULL DEFAULT 1,
    key TEXT NOT NULL,
    events TEXT NOT NULL,        -- JSON array of event names
    refs TEXT NOT NULL,          -- JSON array of git refs
    args TEXT NOT NULL,          -- JSON array; args[0] is the executable
    timeout_secs INTEGER,        -- NULL waits indefinitely
    created_at TEXT NOT NULL
);

-- Append-only execution records. target_id is deliberately not a foreign
-- key: deployments outlive their target.
CREATE TABLE IF NOT EXISTS deployments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    target_id TEXT NOT NULL,
    start_time TEXT NOT NULL,
    elapsed_ms INTEGER,
    status INTEGER,
    stdout TEXT,
    stderr TEXT,
    timed_out INTEGER NOT NULL DEFAULT 0,
    timeout_secs INTEGER,
    launch_error_kind TEXT,
    launch_error TEXT
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_deployments_target ON deployments(target_id);
"#;

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse a JSON string-array column into an ordered set.
fn parse_string_set(
    value: &str,
    column: &str,
) -> std::result::Result<BTreeSet<String>, rusqlite::Error> {
    serde_json::from_str(value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid JSON array '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse a JSON string-array column into an ordered sequence.
fn parse_string_vec(
    value: &str,
    column: &str,
) -> std::result::Result<Vec<String>, rusqlite::Error> {
    serde_json::from_str(value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid JSON array '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Convert an optional non-negative seconds column into a duration.
fn parse_timeout_opt(
    value: Option<i64>,
    column: &str,
) -> std::result::Result<Option<Duration>, rusqlite::Error> {
    match value {
        None => Ok(None),
        Some(secs) if secs >= 0 => Ok(Some(Duration::from_secs(secs as u64))),
        Some(secs) => Err(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(Error::CorruptedData(format!(
                "negative value '{secs}' in column '{column}'"
            ))),
        )),
    }
}

/// Reassemble the outcome shape from the flattened deployment columns.
///
/// Exactly one shape must fit; anything else is corrupted data.
#[allow(clippy::too_many_arguments)]
fn assemble_outcome(
    id: i64,
    elapsed_ms: Option<i64>,
    status: Option<i64>,
    stdout: Option<String>,
    stderr: Option<String>,
    timed_out: bool,
    timeout_secs: Option<i64>,
    launch_error_kind: Option<String>,
    launch_error: Option<String>,
) -> Result<Outcome> {
    let elapsed = match elapsed_ms {
        None => None,
        Some(ms) if ms >= 0 => Some(Duration::from_millis(ms as u64)),
        Some(ms) => {
            return Err(Error::CorruptedData(format!(
                "deployment {id}: negative elapsed_ms {ms}"
            )))
        }
    };

    match (launch_error_kind, launch_error) {
        (Some(kind), Some(message)) => {
            if timed_out || elapsed.is_some() || status.is_some() {
                return Err(Error::CorruptedData(format!(
                    "deployment {id}: launch failure with execution fields set"
                )));
            }
            Ok(Outcome::LaunchFailed {
                kind: kind.parse()?,
                message,
            })
        }
        (None, None) if timed_out => {
            let (Some(elapsed), Some(bound)) = (elapsed, timeout_secs) else {
                return Err(Error::CorruptedData(format!(
                    "deployment {id}: timed out without elapsed time or bound"
                )));
            };
            if bound < 0 {
                return Err(Error::CorruptedData(format!(
                    "deployment {id}: negative timeout_secs {bound}"
                )));
            }
            Ok(Outcome::TimedOut {
                elapsed,
                timeout: Duration::from_secs(bound as u64),
            })
        }
        (None, None) => {
            let (Some(status), Some(stdout), Some(stderr), Some(elapsed)) =
                (status, stdout, stderr, elapsed)
            else {
                return Err(Error::CorruptedData(format!(
                    "deployment {id}: completed row missing status or streams"
                )));
            };
            Ok(Outcome::Completed {
                status: status as i32,
                stdout,
                stderr,
                elapsed,
            })
        }
        _ => Err(Error::CorruptedData(format!(
            "deployment {id}: launch error kind and message must be set together"
        ))),
    }
}

/// Run schema creation and all migrations on a database connection.
///
/// This is the single migration path for both the CLI and the daemon. It
/// applies the canonical schema and runs idempotent migrations to upgrade
/// databases created before a column existed.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    migrate_add_enabled(conn)?;
    Ok(())
}

/// Migration: add the enabled column to databases created before the gate.
fn migrate_add_enabled(conn: &Connection) -> Result<()> {
    let has_enabled: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('targets') WHERE name = 'enabled'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if !has_enabled {
        conn.execute(
            "ALTER TABLE targets ADD COLUMN enabled INTEGER NOT NULL DEFAULT 1",
            [],
        )?;
    }
    Ok(())
}

const TARGET_COLUMNS: &str =
    "id, description, enabled, key, events, refs, args, timeout_secs, created_at";

const DEPLOYMENT_COLUMNS: &str = "id, target_id, start_time, elapsed_ms, status, stdout, \
     stderr, timed_out, timeout_secs, launch_error_kind, launch_error";

/// SQLite database connection with ploy storage operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL mode so the daemon and CLI can share the file
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Register a new target.
    ///
    /// Validates the construction invariants first; a duplicate id is
    /// reported as [`Error::TargetExists`].
    pub fn create_target(&self, target: &Target) -> Result<()> {
        target.validate()?;

        let result = self.conn.execute(
            "INSERT INTO targets (id, description, enabled, key, events, refs, args,
             timeout_secs, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                target.id,
                target.description,
                target.enabled,
                target.key,
                serde_json::to_string(&target.events)?,
                serde_json::to_string(&target.refs)?,
                serde_json::to_string(&target.args)?,
                target.timeout.map(|t| t.as_secs() as i64),
                target.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TargetExists(target.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a target by id. Absent targets are `Ok(None)`, not an error;
    /// the caller decides how much to reveal about why a request failed.
    pub fn get_target(&self, id: &str) -> Result<Option<Target>> {
        let target = self
            .conn
            .query_row(
                &format!("SELECT {TARGET_COLUMNS} FROM targets WHERE id = ?1"),
                params![id],
                Self::map_target_row,
            )
            .optional()?;

        if let Some(ref t) = target {
            t.validate()
                .map_err(|e| Error::CorruptedData(format!("target '{}': {e}", t.id)))?;
        }
        Ok(target)
    }

    /// List all targets, oldest first.
    pub fn list_targets(&self) -> Result<Vec<Target>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TARGET_COLUMNS} FROM targets ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([], Self::map_target_row)?;

        let mut targets = Vec::new();
        for row in rows {
            targets.push(row?);
        }
        Ok(targets)
    }

    /// Enable or disable a target.
    pub fn set_target_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE targets SET enabled = ?1 WHERE id = ?2",
            params![enabled, id],
        )?;

        if affected == 0 {
            return Err(Error::TargetNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Delete a target. Its deployments are kept; their target_id dangles.
    pub fn delete_target(&self, id: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM targets WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(Error::TargetNotFound(id.to_string()));
        }
        Ok(())
    }

    fn map_target_row(row: &rusqlite::Row<'_>) -> std::result::Result<Target, rusqlite::Error> {
        let events_str: String = row.get(4)?;
        let refs_str: String = row.get(5)?;
        let args_str: String = row.get(6)?;
        let timeout_secs: Option<i64> = row.get(7)?;
        let created_str: String = row.get(8)?;

        Ok(Target {
            id: row.get(0)?,
            description: row.get(1)?,
            enabled: row.get(2)?,
            key: row.get(3)?,
            events: parse_string_set(&events_str, "events")?,
            refs: parse_string_set(&refs_str, "refs")?,
            args: parse_string_vec(&args_str, "args")?,
            timeout: parse_timeout_opt(timeout_secs, "timeout_secs")?,
            created_at: parse_timestamp(&created_str, "created_at")?,
        })
    }

    /// Persist a deployment record. One atomic append; returns the assigned
    /// id. There is no update or delete for deployments.
    pub fn save_deployment(&self, deployment: &Deployment) -> Result<i64> {
        let (elapsed_ms, status, stdout, stderr, timed_out, timeout_secs, kind, message) =
            match &deployment.outcome {
                Outcome::Completed {
                    status,
                    stdout,
                    stderr,
                    elapsed,
                } => (
                    Some(elapsed.as_millis() as i64),
                    Some(*status as i64),
                    Some(stdout.as_str()),
                    Some(stderr.as_str()),
                    false,
                    None,
                    None,
                    None,
                ),
                Outcome::TimedOut { elapsed, timeout } => (
                    Some(elapsed.as_millis() as i64),
                    None,
                    None,
                    None,
                    true,
                    Some(timeout.as_secs() as i64),
                    None,
                    None,
                ),
                Outcome::LaunchFailed { kind, message } => (
                    None,
                    None,
                    None,
                    None,
                    false,
                    None,
                    Some(kind.as_str()),
                    Some(message.as_str()),
                ),
            };

        self.conn.execute(
            "INSERT INTO deployments (target_id, start_time, elapsed_ms, status, stdout,
             stderr, timed_out, timeout_secs, launch_error_kind, launch_error)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                deployment.target_id,
                deployment.start_time.to_rfc3339(),
                elapsed_ms,
                status,
                stdout,
                stderr,
                timed_out,
                timeout_secs,
                kind,
                message,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// List deployments, newest first, optionally filtered by target.
    pub fn list_deployments(
        &self,
        limit: usize,
        target: Option<&str>,
    ) -> Result<Vec<Deployment>> {
        let mut deployments = Vec::new();

        match target {
            Some(target_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {DEPLOYMENT_COLUMNS} FROM deployments
                     WHERE target_id = ?1 ORDER BY id DESC LIMIT ?2"
                ))?;
                let rows = stmt.query_map(params![target_id, limit as i64], Self::map_deployment_row)?;
                for row in rows {
                    deployments.push(row??);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {DEPLOYMENT_COLUMNS} FROM deployments
                     ORDER BY id DESC LIMIT ?1"
                ))?;
                let rows = stmt.query_map(params![limit as i64], Self::map_deployment_row)?;
                for row in rows {
                    deployments.push(row??);
                }
            }
        }

        Ok(deployments)
    }

    fn map_deployment_row(
        row: &rusqlite::Row<'_>,
    ) -> std::result::Result<Result<Deployment>, rusqlite::Error> {
        let id: i64 = row.get(0)?;
        let target_id: String = row.get(1)?;
        let start_str: String = row.get(2)?;
        let elapsed_ms: Option<i64> = row.get(3)?;
        let status: Option<i64> = row.get(4)?;
        let stdout: Option<String> = row.get(5)?;
        let stderr: Option<String> = row.get(6)?;
        let timed_out: bool = row.get(7)?;
        let timeout_secs: Option<i64> = row.get(8)?;
        let launch_error_kind: Option<String> = row.get(9)?;
        let launch_error: Option<String> = row.get(10)?;

        let start_time = parse_timestamp(&start_str, "start_time")?;

        Ok(assemble_outcome(
            id,
            elapsed_ms,
            status,
            stdout,
            stderr,
            timed_out,
            timeout_secs,
            launch_error_kind,
            launch_error,
        )
        .map(|outcome| Deployment {
            id,
            target_id,
            start_time,
            outcome,
        }))
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
