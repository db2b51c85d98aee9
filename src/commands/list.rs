//! `rubric list` command

use rubric_core::error::Result;
use rubric_core::store::MethodFilter;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

/// Execute the list command
pub fn execute(ctx: &CommandContext, filter: &MethodFilter) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let summaries = store.list_methods(filter)?;

    match ctx.cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Human => {
            if summaries.is_empty() {
                if !ctx.cli.quiet {
                    println!("No grading methods found");
                }
                return Ok(());
            }
            for summary in &summaries {
                println!(
                    "{}  {}  by {}  {}{}",
                    summary.id,
                    summary.name,
                    summary.creator_id,
                    summary.created_at.format("%Y-%m-%d %H:%M"),
                    if summary.is_public { "  public" } else { "" }
                );
            }
        }
    }
    Ok(())
}
