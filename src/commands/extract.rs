//! `compact-guard extract` - manual trigger
//!
//! Runs the same extract-and-persist pipeline as the pre-compaction hook, but
//! reports errors with their normal exit codes.

use crate::cli::paths::resolve_cwd;
use crate::cli::{ExtractArgs, OutputFormat};
use crate::commands::dispatch::{trace_command, CommandContext};
use compact_guard_core::error::Result;
use compact_guard_core::hooks::{saved_diagnostics, ExtractRequest, Pipeline};
use compact_guard_core::project_key::ProjectKey;
use compact_guard_core::summary::render_sections;

pub fn execute(ctx: &CommandContext, args: &ExtractArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let pipeline = Pipeline::from_config(&config)?;

    let request = ExtractRequest {
        cwd: resolve_cwd(args.cwd.as_deref())?,
        transcript: args.transcript.clone(),
        session: args.session.clone(),
        trigger: Some("manual".to_string()),
    };

    let saved = pipeline.run(&request)?;
    trace_command!(ctx.start, "extract");

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "project": saved.entry.meta.project,
                "key": ProjectKey::from_cwd(&saved.entry.meta.project).as_str(),
                "transcript": saved.transcript.display().to_string(),
                "structured": saved.entry.meta.structured,
                "global": saved.report.global.display().to_string(),
                "local": saved.report.local.as_ref().map(|p| p.display().to_string()),
                "summary": saved.entry.summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            ctx.emit_diagnostics(&saved_diagnostics(&saved));
            print!("{}", render_sections(&saved.entry.summary));
        }
    }

    Ok(())
}
