//! `rubric update` command - replace a grading method's tree

use uuid::Uuid;

use rubric_core::builder::CreateMethodRequest;
use rubric_core::error::Result;

use crate::commands::dispatch::{read_input, CommandContext};
use crate::commands::render;

/// Execute the update command
pub fn execute(ctx: &CommandContext, id: Uuid, request_path: &str) -> Result<()> {
    let request = CreateMethodRequest::from_json(&read_input(request_path)?)?;
    let store = ctx.discover_or_open_store()?;

    let method = store.update_method(id, &request)?;
    render::print_saved(ctx, &store, &method, "Updated")
}
