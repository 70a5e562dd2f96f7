//! `compact-guard hook` - handlers invoked by the host
//!
//! Both handlers read the event payload from stdin and always succeed: any
//! failure is reported as a diagnostic on stderr and the event becomes a
//! no-op, so the host session is never interrupted. Only the session-start
//! context block is written to stdout.

use std::io;

use crate::cli::{HookCommands, OutputFormat};
use crate::commands::dispatch::{trace_command, CommandContext};
use compact_guard_core::error::Result;
use compact_guard_core::hooks::{self, HookPayload, Pipeline};
use compact_guard_core::inject::{diagnostic, hook_json};
use compact_guard_core::store::DecisionStore;

pub fn execute(ctx: &CommandContext, command: HookCommands) -> Result<()> {
    if hooks::hooks_disabled(|key| std::env::var(key).ok()) {
        tracing::debug!(?command, "hooks disabled for this process");
        return Ok(());
    }

    let payload = HookPayload::from_reader(io::stdin().lock());
    trace_command!(ctx.start, "read_payload");

    match command {
        HookCommands::PreCompact => pre_compact(ctx, &payload),
        HookCommands::SessionStart => session_start(ctx, &payload),
    }
    Ok(())
}

fn pre_compact(ctx: &CommandContext, payload: &HookPayload) {
    let pipeline = match ctx.load_config().and_then(|config| Pipeline::from_config(&config)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            ctx.emit_diagnostics(&[diagnostic(format!("configuration error: {}", e))]);
            return;
        }
    };

    let lines = pipeline.pre_compact(payload);
    trace_command!(ctx.start, "pre_compact");
    ctx.emit_diagnostics(&lines);
}

fn session_start(ctx: &CommandContext, payload: &HookPayload) {
    let store = match ctx
        .load_config()
        .and_then(|config| DecisionStore::from_config(&config.store))
    {
        Ok(store) => store,
        Err(e) => {
            ctx.emit_diagnostics(&[diagnostic(format!("configuration error: {}", e))]);
            return;
        }
    };

    let injection = hooks::session_start(payload, &store);
    trace_command!(ctx.start, "session_start");

    if let Some(context) = &injection.context {
        match ctx.cli.format {
            OutputFormat::Json => println!("{}", hook_json(context)),
            OutputFormat::Human => print!("{}", context),
        }
    }
    ctx.emit_diagnostics(&injection.diagnostics);
}
