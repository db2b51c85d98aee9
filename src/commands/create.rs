//! `rubric create` command - build and persist a grading method

use rubric_core::builder::CreateMethodRequest;
use rubric_core::error::Result;

use crate::commands::dispatch::{read_input, CommandContext};
use crate::commands::render;

/// Execute the create command
pub fn execute(ctx: &CommandContext, request_path: &str) -> Result<()> {
    let request = CreateMethodRequest::from_json(&read_input(request_path)?)?;
    let store = ctx.discover_or_open_store()?;

    let method = store.create_method(&request)?;
    render::print_saved(ctx, &store, &method, "Created")
}
