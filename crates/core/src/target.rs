// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Target`] entity: a registered deployment trigger.
//!
//! A target ties a shared secret, an event filter, a ref filter, and a
//! command vector together under an opaque identifier. Webhooks that
//! authenticate against the secret and pass both filters cause the command
//! to run.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A registered deployment trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Opaque unique identifier, chosen by the operator.
    pub id: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled targets never execute.
    pub enabled: bool,
    /// Shared secret for signature verification. Never logged or displayed.
    pub key: String,
    /// Webhook event names this target accepts.
    pub events: BTreeSet<String>,
    /// Git refs this target accepts.
    pub refs: BTreeSet<String>,
    /// Command vector; `args[0]` is the executable.
    pub args: Vec<String>,
    /// Wall-clock bound for a run. `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// When the target was registered.
    pub created_at: DateTime<Utc>,
}

impl Target {
    /// Creates an enabled target, validating the construction invariants.
    pub fn new(
        id: String,
        key: String,
        events: BTreeSet<String>,
        refs: BTreeSet<String>,
        args: Vec<String>,
        timeout: Option<Duration>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let target = Target {
            id,
            description: None,
            enabled: true,
            key,
            events,
            refs,
            args,
            timeout,
            created_at,
        };
        target.validate()?;
        Ok(target)
    }

    /// Checks the invariants a target must hold to be executable.
    ///
    /// `args` must be non-empty so there is always an executable to spawn,
    /// and `key` must be non-empty so an empty offered signature can never
    /// verify against an empty secret.
    pub fn validate(&self) -> Result<()> {
        if self.args.is_empty() {
            return Err(Error::EmptyCommand);
        }
        if self.key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(())
    }

    /// The command vector joined for display.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
