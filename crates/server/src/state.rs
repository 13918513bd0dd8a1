// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared daemon state.
//!
//! Wraps the database for thread-safe access. The mutex is held only for
//! the duration of a single storage call; a request waiting on a running
//! deployment never holds it.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use ploy_core::{Database, Deployment, Result, Target};

use crate::locks::TargetLocks;

/// Shared server state containing the database and the optional
/// per-target execution locks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The shared database (protected by mutex for writes).
    db: Mutex<Database>,
    /// Per-target execution locks; `None` permits overlapping runs.
    locks: Option<TargetLocks>,
}

impl AppState {
    /// Opens (creating if needed) the database at the given path.
    pub fn open(db_path: &Path, serialize: bool) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self::with_database(db, serialize))
    }

    /// Wraps an already-open database (used by tests).
    pub fn with_database(db: Database, serialize: bool) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                db: Mutex::new(db),
                locks: serialize.then(TargetLocks::new),
            }),
        }
    }

    /// Looks up a target by id.
    pub async fn get_target(&self, id: &str) -> Result<Option<Target>> {
        self.inner.db.lock().await.get_target(id)
    }

    /// Persists a deployment record, returning its assigned id.
    pub async fn save_deployment(&self, deployment: &Deployment) -> Result<i64> {
        self.inner.db.lock().await.save_deployment(deployment)
    }

    /// The per-target locks when serialization is enabled.
    pub fn locks(&self) -> Option<&TargetLocks> {
        self.inner.locks.as_ref()
    }
}
