// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ploy")]
#[command(about = "Administer webhook-triggered deployment targets")]
#[command(
    long_about = "Administer webhook-triggered deployment targets.\n\n\
    Targets registered here are served by the ployd daemon: a signed webhook\n\
    that matches a target's event and ref filters runs the target's command,\n\
    and every attempt is recorded as a deployment."
)]
pub struct Cli {
    /// Path to the ploy database
    #[arg(long, global = true, default_value = "ploy.db", env = "PLOY_DB")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize (or migrate) the database schema
    Init,

    /// Register a new deployment target
    #[command(after_help = "Examples:\n  \
        ploy create site -k s3cr3t -- git pull                 Deploy on push to refs/heads/deploy\n  \
        ploy create site -k s3cr3t -r refs/heads/main -- make  Custom ref filter\n  \
        ploy create site -k s3cr3t -t 300 -- make deploy       Kill the command after 5 minutes")]
    Create {
        /// Target identifier, used in the webhook URL (/hook/<id>)
        id: String,

        /// Shared secret webhooks must be signed with
        #[arg(long, short)]
        key: String,

        /// Free-text description
        #[arg(long, short)]
        description: Option<String>,

        /// Webhook event to accept (repeatable)
        #[arg(long = "event", short, default_values_t = [String::from("push")])]
        events: Vec<String>,

        /// Git ref to accept (repeatable)
        #[arg(long = "ref", short, default_values_t = [String::from("refs/heads/deploy")])]
        refs: Vec<String>,

        /// Kill the command after this many seconds (default: wait forever)
        #[arg(long, short)]
        timeout: Option<u64>,

        /// Register the target disabled
        #[arg(long)]
        disabled: bool,

        /// Command to run; the first value is the executable
        #[arg(required = true, last = true)]
        args: Vec<String>,
    },

    /// List registered targets
    Targets,

    /// List recorded deployments, newest first
    Deployments {
        /// Maximum number of rows
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,

        /// Only show deployments for this target
        #[arg(long)]
        target: Option<String>,
    },

    /// Enable a target
    #[command(arg_required_else_help = true)]
    Enable {
        /// Target identifier
        id: String,
    },

    /// Disable a target (its webhooks answer 404 while disabled)
    #[command(arg_required_else_help = true)]
    Disable {
        /// Target identifier
        id: String,
    },

    /// Delete a target (its deployment history is kept)
    #[command(arg_required_else_help = true)]
    Delete {
        /// Target identifier
        id: String,
    },
}
