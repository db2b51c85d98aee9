//! Command dispatch logic for rubric

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::cli::paths::{resolve_root_path, resolve_store_path};
use crate::cli::{Cli, Commands};
use crate::commands;
use rubric_core::error::Result;
use rubric_core::store::{MethodFilter, Store};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a Path,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a Path, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// Open `--store` if given, otherwise discover a store from the root
    pub fn discover_or_open_store(&self) -> Result<Store> {
        let store = match &self.cli.store {
            Some(path) => Store::open(&resolve_store_path(self.root, path))?,
            None => Store::discover(self.root)?,
        };
        debug!(elapsed = ?self.start.elapsed(), "open_store");
        Ok(store)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("rubric {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Build, grade and store hierarchical grading methods.");
        println!();
        println!("Run `rubric --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Init { backend } => commands::init::execute(ctx, *backend),
            Commands::Create { request } => commands::create::execute(ctx, request),
            Commands::Update { id, request } => commands::update::execute(ctx, *id, request),
            Commands::Show { id, template } => commands::show::execute(ctx, *id, *template),
            Commands::Grade {
                id,
                values,
                inputs_file,
            } => commands::grade::execute(ctx, *id, values, inputs_file.as_deref()),
            Commands::List { creator, public } => {
                let filter = MethodFilter {
                    creator_id: creator.clone(),
                    public_only: *public,
                };
                commands::list::execute(ctx, &filter)
            }
            Commands::Delete { id } => commands::delete::execute(ctx, *id),
            Commands::Export { id } => commands::export::execute(ctx, *id),
        }
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root: PathBuf = resolve_root_path(cli.root.clone());
    debug!(elapsed = ?start.elapsed(), "resolve_root");

    let ctx = CommandContext::new(cli, &root, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}

/// Read a request file, or stdin when the path is `-`
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
