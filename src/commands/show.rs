//! `compact-guard show` - print the stored decisions for a project
//!
//! Human output is the stored file exactly as the session-start hook would
//! read it; the tier it came from is reported on stderr.

use crate::cli::paths::resolve_cwd;
use crate::cli::{OutputFormat, ProjectArgs};
use crate::commands::dispatch::{trace_command, CommandContext};
use compact_guard_core::error::Result;
use compact_guard_core::inject::diagnostic;
use compact_guard_core::store::DecisionStore;

pub fn execute(ctx: &CommandContext, args: &ProjectArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let store = DecisionStore::from_config(&config.store)?;
    let cwd = resolve_cwd(args.cwd.as_deref())?;

    let resolved = store.require(&cwd)?;
    trace_command!(ctx.start, "resolve_entry");

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "tier": resolved.tier,
                "path": resolved.path.display().to_string(),
                "meta": resolved.entry.meta,
                "summary": resolved.entry.summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            ctx.emit_diagnostics(&[diagnostic(format!(
                "{} tier: {}",
                resolved.tier,
                resolved.path.display()
            ))]);
            print!("{}", resolved.entry.to_markdown()?);
        }
    }

    Ok(())
}
