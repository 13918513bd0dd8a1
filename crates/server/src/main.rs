// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ployd: Webhook deployment daemon.
//!
//! Listens for signed GitHub-style webhooks, matches them against registered
//! targets, runs each target's command, and records every execution attempt
//! in the shared SQLite database the `ploy` CLI administers.

mod executor;
mod handler;
mod locks;
mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// ployd: Webhook-triggered deployment daemon
#[derive(Parser, Debug)]
#[command(name = "ployd")]
#[command(about = "Runs registered deployment commands in response to signed webhooks")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:8400")]
    bind: SocketAddr,

    /// Path to the ploy database
    #[arg(long, default_value = "ploy.db", env = "PLOY_DB")]
    db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Serialize deployments per target (overlapping webhooks queue instead
    /// of spawning concurrent processes)
    #[arg(long)]
    serialize: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ployd");
    info!("  Bind address: {}", args.bind);
    info!("  Database: {}", args.db.display());
    if args.serialize {
        info!("  Per-target serialization: enabled");
    }

    let state = state::AppState::open(&args.db, args.serialize)?;

    server::run(args.bind, state).await?;

    Ok(())
}
