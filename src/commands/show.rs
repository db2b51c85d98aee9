//! `rubric show` command - display a grading method

use uuid::Uuid;

use rubric_core::error::Result;
use rubric_core::view::MethodView;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::render;

/// Execute the show command
pub fn execute(ctx: &CommandContext, id: Uuid, template: bool) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let method = store.get_method(id)?;

    let view = if template {
        MethodView::template(&method)
    } else {
        MethodView::graded(&method)
    };

    match ctx.cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Human => render::print_method(&view, &store.config().display),
    }
    Ok(())
}
