//! `rubric init` command - create a new store
//!
//! Idempotent: running it on an existing store keeps its configuration.

use rubric_core::config::Backend;
use rubric_core::error::Result;
use rubric_core::store::{InitOptions, Store};

use crate::cli::paths::resolve_store_path;
use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

/// Execute the init command
pub fn execute(ctx: &CommandContext, backend: Option<Backend>) -> Result<()> {
    let options = InitOptions { backend };

    let store = match &ctx.cli.store {
        Some(path) => Store::init_at(&resolve_store_path(ctx.root, path), options)?,
        None => Store::init(ctx.root, options)?,
    };

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "store": store.root().display().to_string(),
                "backend": store.config().backend,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Initialized rubric store at {} ({} backend)",
                    store.root().display(),
                    store.config().backend
                );
            }
        }
    }
    Ok(())
}
