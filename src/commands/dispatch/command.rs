//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::Cli;
use compact_guard_core::config::GuardConfig;
use compact_guard_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    /// Load configuration from `--config` or the default location
    pub fn load_config(&self) -> Result<GuardConfig> {
        let config = GuardConfig::load(self.cli.config.as_deref())?;
        super::trace_command!(self.start, "load_config");
        Ok(config)
    }

    /// Write diagnostic lines to stderr unless `--quiet`
    pub fn emit_diagnostics(&self, lines: &[String]) {
        if self.cli.quiet {
            return;
        }
        for line in lines {
            eprintln!("{}", line);
        }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("compact-guard {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Keeps design decisions alive across context compaction.");
        println!();
        println!("Run `compact-guard --help` for usage information.");
        Ok(())
    }
}
