// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Deployment`] record: one immutable row per execution attempt.
//!
//! Exactly one of the three [`Outcome`] shapes applies to a deployment.
//! Records are created by the executor at the instant a command is
//! attempted, persisted once, and never mutated or deleted by the core.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a process could not be launched.
///
/// The three kinds share the LaunchFailed outcome shape but must stay
/// distinguishable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchErrorKind {
    /// The operating system refused the spawn (missing binary, permissions).
    Os,
    /// The command vector itself was unusable.
    InvalidArgs,
    /// The subprocess plumbing failed after the OS accepted the request.
    Machinery,
}

impl LaunchErrorKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchErrorKind::Os => "os",
            LaunchErrorKind::InvalidArgs => "invalid_args",
            LaunchErrorKind::Machinery => "machinery",
        }
    }

    /// Human-readable class of the failure.
    pub fn describe(&self) -> &'static str {
        match self {
            LaunchErrorKind::Os => "operating system error",
            LaunchErrorKind::InvalidArgs => "invalid process arguments",
            LaunchErrorKind::Machinery => "subprocess machinery error",
        }
    }
}

impl fmt::Display for LaunchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LaunchErrorKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "os" => Ok(LaunchErrorKind::Os),
            "invalid_args" => Ok(LaunchErrorKind::InvalidArgs),
            "machinery" => Ok(LaunchErrorKind::Machinery),
            _ => Err(crate::error::Error::CorruptedData(format!(
                "invalid launch error kind '{s}'"
            ))),
        }
    }
}

/// How an execution attempt ended. Mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The process ran to completion before any bound.
    Completed {
        /// Process exit code. -1 when the process died to a signal.
        status: i32,
        /// Captured standard output, lossily decoded.
        stdout: String,
        /// Captured standard error, lossily decoded.
        stderr: String,
        /// Wall-clock duration from spawn to exit.
        elapsed: Duration,
    },
    /// The bound expired and the process was hard-killed.
    TimedOut {
        /// Wall-clock duration from spawn to the kill.
        elapsed: Duration,
        /// The bound that was exceeded.
        timeout: Duration,
    },
    /// Process creation itself failed; the timer never started.
    LaunchFailed {
        /// Diagnostic class of the failure.
        kind: LaunchErrorKind,
        /// Human-readable rendering of the underlying cause.
        message: String,
    },
}

impl Outcome {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Completed { status: 0, .. } => "ok",
            Outcome::Completed { .. } => "failed",
            Outcome::TimedOut { .. } => "timed out",
            Outcome::LaunchFailed { .. } => "launch error",
        }
    }
}

/// One immutable record of an execution attempt against a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Monotonically increasing identifier. 0 until persisted; the save
    /// assigns the real row id.
    pub id: i64,
    /// Owning target. May dangle after the target is deleted; deployments
    /// are audit records and do not cascade.
    pub target_id: String,
    /// When execution was attempted.
    pub start_time: DateTime<Utc>,
    /// How the attempt ended.
    pub outcome: Outcome,
}

impl Deployment {
    /// Creates an unsaved deployment record.
    pub fn new(target_id: String, start_time: DateTime<Utc>, outcome: Outcome) -> Self {
        Deployment {
            id: 0,
            target_id,
            start_time,
            outcome,
        }
    }
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
