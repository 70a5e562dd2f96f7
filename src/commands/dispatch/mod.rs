//! Command dispatch logic for compact-guard

use std::time::Instant;

use crate::cli::Cli;
use compact_guard_core::error::Result;

mod command;
mod commands;
mod macros;

pub use command::{Command, CommandContext, NoCommand};
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let ctx = CommandContext::new(cli, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
