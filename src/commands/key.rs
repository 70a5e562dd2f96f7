//! `compact-guard key` - print the project key for a path

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use compact_guard_core::error::Result;
use compact_guard_core::project_key::ProjectKey;

pub fn execute(ctx: &CommandContext, path: &str) -> Result<()> {
    let key = ProjectKey::from_cwd(path);

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path,
                "key": key.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => println!("{}", key),
    }

    Ok(())
}
