// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Target command execution.
//!
//! Spawns the target's command vector, waits for it under the configured
//! bound, and captures the result as a [`Deployment`] value. Every failure
//! path is an [`Outcome`] variant; this module never returns an error.

use std::process::Stdio;
use std::time::Instant;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use ploy_core::{Deployment, LaunchErrorKind, Outcome, Target};

/// Runs the target's command once and returns the deployment record.
///
/// Stdout and stderr are captured, never inherited. When the bound
/// expires the process is hard-killed with no grace period; whatever
/// output it produced is discarded along with it.
pub async fn execute(target: &Target) -> Deployment {
    let start_time = Utc::now();

    let Some((program, args)) = target.args.split_first() else {
        // Unreachable for validated targets; captured rather than panicking.
        return Deployment::new(
            target.id.clone(),
            start_time,
            Outcome::LaunchFailed {
                kind: LaunchErrorKind::InvalidArgs,
                message: "invalid process arguments: empty command vector".into(),
            },
        );
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let (kind, message) = classify_spawn_error(&e);
            warn!(target_id = %target.id, %message, "failed to launch command");
            return Deployment::new(
                target.id.clone(),
                start_time,
                Outcome::LaunchFailed { kind, message },
            );
        }
    };

    let timer = Instant::now();

    // Drain the pipes concurrently with the wait so a chatty child can
    // never fill a pipe buffer and deadlock against us.
    let stdout_task = child.stdout.take().map(drain);
    let stderr_task = child.stderr.take().map(drain);

    let waited = match target.timeout {
        Some(bound) => match tokio::time::timeout(bound, child.wait()).await {
            Ok(result) => result,
            Err(_) => {
                // Hard kill, then reap.
                let _ = child.start_kill();
                let _ = child.wait().await;
                let elapsed = timer.elapsed();
                warn!(
                    target_id = %target.id,
                    timeout_secs = bound.as_secs(),
                    "deployment timed out, process killed"
                );
                return Deployment::new(
                    target.id.clone(),
                    start_time,
                    Outcome::TimedOut {
                        elapsed,
                        timeout: bound,
                    },
                );
            }
        },
        None => child.wait().await,
    };

    let elapsed = timer.elapsed();

    let status = match waited {
        Ok(status) => status,
        Err(e) => {
            let message = format!("{}: {e}", LaunchErrorKind::Machinery.describe());
            warn!(target_id = %target.id, %message, "wait on child failed");
            return Deployment::new(
                target.id.clone(),
                start_time,
                Outcome::LaunchFailed {
                    kind: LaunchErrorKind::Machinery,
                    message,
                },
            );
        }
    };

    let stdout = collect(stdout_task).await;
    let stderr = collect(stderr_task).await;

    debug!(
        target_id = %target.id,
        status = status.code().unwrap_or(-1),
        elapsed_ms = elapsed.as_millis() as u64,
        "deployment completed"
    );

    Deployment::new(
        target.id.clone(),
        start_time,
        Outcome::Completed {
            // -1 marks a signal death; there is no exit code to report.
            status: status.code().unwrap_or(-1),
            stdout,
            stderr,
            elapsed,
        },
    )
}

/// Classify a spawn error into the three diagnostic launch failure kinds.
fn classify_spawn_error(e: &std::io::Error) -> (LaunchErrorKind, String) {
    let kind = if e.kind() == std::io::ErrorKind::InvalidInput {
        LaunchErrorKind::InvalidArgs
    } else if e.raw_os_error().is_some() {
        LaunchErrorKind::Os
    } else {
        LaunchErrorKind::Machinery
    };
    (kind, format!("{}: {e}", kind.describe()))
}

/// Read a pipe to EOF on its own task.
fn drain<R>(mut reader: R) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf).await;
        buf
    })
}

/// Join a drain task, decoding lossily so invalid bytes never fail a run.
async fn collect(task: Option<JoinHandle<Vec<u8>>>) -> String {
    match task {
        Some(handle) => match handle.await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        },
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
