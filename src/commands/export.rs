//! `rubric export` command - print the document form of a method
//!
//! Output is always the JSON document, whatever the backend, so it can be
//! fed back through the document codec.

use uuid::Uuid;

use rubric_core::codec::document;
use rubric_core::error::Result;

use crate::commands::dispatch::CommandContext;

/// Execute the export command
pub fn execute(ctx: &CommandContext, id: Uuid) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let method = store.get_method(id)?;

    let json = document::to_json(&document::encode(&method), store.config().document.pretty)?;
    println!("{}", json);
    Ok(())
}
