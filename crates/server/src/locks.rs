// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optional per-target execution serialization.
//!
//! The legacy behavior lets two webhooks for the same target spawn two
//! overlapping processes. With `--serialize`, deployments for a given
//! target id queue behind one another instead; deployments for different
//! targets never wait on each other. Retried webhook deliveries are a
//! normal occurrence, so this stays opt-in.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-target execution locks, created lazily per target id.
pub struct TargetLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TargetLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        TargetLocks {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the lock for a target id, waiting behind any in-flight
    /// deployment for the same target. The registry lock is released
    /// before waiting so other targets are never blocked.
    pub async fn acquire(&self, target_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(target_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

impl Default for TargetLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
