//! `rubric delete` command

use uuid::Uuid;

use rubric_core::error::Result;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

/// Execute the delete command
pub fn execute(ctx: &CommandContext, id: Uuid) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    store.delete_method(id)?;

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "status": "ok", "id": id });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("Deleted grading method {}", id);
            }
        }
    }
    Ok(())
}
