// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ploy-core operations.

use thiserror::Error;

/// All possible errors that can occur in ploy-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("target already exists: {0}")]
    TargetExists(String),

    #[error("target command must not be empty\n  hint: pass the executable and its arguments after '--'")]
    EmptyCommand,

    #[error("target key must not be empty\n  hint: the key is the shared secret webhooks are signed with")]
    EmptyKey,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ploy-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
