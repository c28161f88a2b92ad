//! Command dispatch logic for dispo

use std::time::Instant;

use crate::cli::paths::resolve_root_path;
use crate::cli::Cli;
use dispo_core::error::Result;
use tracing::debug;

mod bulk_ops;
mod buyers;
mod command;
mod commands;
mod groups;
mod io;
mod macros;
mod maintenance;
mod tags;

use command::{Command, CommandContext, NoCommand};
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Determine the root directory
    let root = resolve_root_path(cli.root.clone());

    debug!(elapsed = ?start.elapsed(), "resolve_root");

    let ctx = CommandContext::new(cli, &root, start);

    // Execute command
    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
