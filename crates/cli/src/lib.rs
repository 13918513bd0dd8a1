// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ployrs - Administrative library for the ploy deploy-hook service.
//!
//! This crate provides the functionality behind the `ploy` CLI tool, which
//! manages the deployment targets and run history that the `ployd` daemon
//! acts on. Both share one SQLite database.
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - clap argument definitions
//! - [`commands`] - one function per subcommand
//! - [`display`] - tabular formatting for targets and deployments

mod cli;
pub mod commands;
pub mod display;

pub use cli::{Cli, Command};

use ploy_core::Result;

/// Dispatches a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init => commands::init(&cli.db),
        Command::Create {
            id,
            key,
            description,
            events,
            refs,
            timeout,
            disabled,
            args,
        } => commands::create(
            &cli.db,
            commands::CreateTarget {
                id,
                key,
                description,
                events,
                refs,
                timeout,
                disabled,
                args,
            },
        ),
        Command::Targets => commands::targets(&cli.db),
        Command::Deployments { limit, target } => {
            commands::deployments(&cli.db, limit, target.as_deref())
        }
        Command::Enable { id } => commands::set_enabled(&cli.db, &id, true),
        Command::Disable { id } => commands::set_enabled(&cli.db, &id, false),
        Command::Delete { id } => commands::delete(&cli.db, &id),
    }
}
