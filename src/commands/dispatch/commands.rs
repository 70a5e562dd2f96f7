//! Command implementations for all compact-guard commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{extract, hook, key, show, status};
use compact_guard_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Hook { command } => hook::execute(ctx, *command),
            Commands::Extract(args) => extract::execute(ctx, args),
            Commands::Show(args) => show::execute(ctx, args),
            Commands::Status(args) => status::execute(ctx, args),
            Commands::Key { path } => key::execute(ctx, path),
        }
    }
}
