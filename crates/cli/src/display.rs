// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular output for targets and deployments.
//!
//! Plain column-aligned text, one header row. The target key is never
//! part of any table.

use std::time::Duration;

use ploy_core::{Deployment, Outcome, Target};

/// Format the target table.
pub fn format_targets(targets: &[Target]) -> String {
    let headers = ["ID", "DESCRIPTION", "ENABLED", "EVENTS", "REFS", "COMMAND", "TIMEOUT"];
    let rows: Vec<Vec<String>> = targets
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.description.clone().unwrap_or_default(),
                if t.enabled { "yes" } else { "no" }.to_string(),
                join(&t.events),
                join(&t.refs),
                t.command_line(),
                t.timeout.map_or_else(|| "-".to_string(), format_duration),
            ]
        })
        .collect();

    render_table(&headers, &rows)
}

/// Format the deployment table, newest first as listed.
pub fn format_deployments(deployments: &[Deployment]) -> String {
    let headers = ["ID", "TARGET", "STARTED", "OUTCOME", "STATUS", "ELAPSED"];
    let rows: Vec<Vec<String>> = deployments
        .iter()
        .map(|d| {
            let (status, elapsed) = match &d.outcome {
                Outcome::Completed {
                    status, elapsed, ..
                } => (status.to_string(), format_duration(*elapsed)),
                Outcome::TimedOut { elapsed, .. } => ("-".to_string(), format_duration(*elapsed)),
                Outcome::LaunchFailed { .. } => ("-".to_string(), "-".to_string()),
            };
            vec![
                d.id.to_string(),
                d.target_id.clone(),
                d.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                d.outcome.label().to_string(),
                status,
                elapsed,
            ]
        })
        .collect();

    render_table(&headers, &rows)
}

/// Render a column-aligned table with a header row.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().map(|h| *h));
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(|c| c.as_str()));
    }
    out
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let mut line = String::new();
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let width = widths.get(i).copied().unwrap_or(0);
        for _ in cell.len()..width {
            line.push(' ');
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn join(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Compact duration rendering: sub-second in milliseconds, otherwise
/// seconds with one decimal.
fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
