//! `compact-guard status` - where decisions for a project live

use std::path::Path;

use crate::cli::paths::resolve_cwd;
use crate::cli::{OutputFormat, ProjectArgs};
use crate::commands::dispatch::CommandContext;
use compact_guard_core::error::Result;
use compact_guard_core::store::DecisionStore;

fn presence(path: &Path, exists: bool) -> String {
    format!(
        "{} ({})",
        path.display(),
        if exists { "present" } else { "missing" }
    )
}

pub fn execute(ctx: &CommandContext, args: &ProjectArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let store = DecisionStore::from_config(&config.store)?;
    let cwd = resolve_cwd(args.cwd.as_deref())?;
    let status = store.status(&cwd);

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "project": cwd,
                "key": status.key,
                "state_dir": store.state_dir().display().to_string(),
                "global": {
                    "path": status.global_file.display().to_string(),
                    "exists": status.global_exists,
                },
                "local": {
                    "dir": status.local_dir.display().to_string(),
                    "dir_exists": status.local_dir_exists,
                    "path": status.local_file.display().to_string(),
                    "exists": status.local_exists,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("project: {}", cwd);
            println!("key:     {}", status.key);
            println!(
                "global:  {}",
                presence(&status.global_file, status.global_exists)
            );
            if status.local_dir_exists {
                println!(
                    "local:   {}",
                    presence(&status.local_file, status.local_exists)
                );
            } else {
                println!(
                    "local:   {} (disabled, directory does not exist)",
                    status.local_file.display()
                );
            }
        }
    }

    Ok(())
}
