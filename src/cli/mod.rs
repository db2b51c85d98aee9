//! CLI argument parsing for rubric
//!
//! Global flags: --root, --store, --format, --quiet, --verbose, --log-level,
//! --log-json

pub mod output;
pub mod parse;
pub mod paths;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use parse::{parse_backend, parse_grade_input, parse_method_id};
pub use output::OutputFormat;
use rubric_core::config::Backend;
use rubric_core::grader::GradeInput;

/// Rubric - build, grade and store hierarchical grading methods
#[derive(Parser, Debug)]
#[command(name = "rubric")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true, env = "RUBRIC_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter: a level (error, warn, info, debug, trace) or full directives
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new rubric store
    Init {
        /// Persistence backend: relational (SQLite) or document (JSON files)
        #[arg(long, value_parser = parse_backend)]
        backend: Option<Backend>,
    },

    /// Create a grading method from a JSON request
    Create {
        /// Request file, or `-` to read stdin
        request: String,
    },

    /// Replace a grading method's tree, keeping its id and creator
    Update {
        /// Grading method id
        #[arg(value_parser = parse_method_id)]
        id: Uuid,

        /// Request file, or `-` to read stdin
        request: String,
    },

    /// Show a grading method
    Show {
        /// Grading method id
        #[arg(value_parser = parse_method_id)]
        id: Uuid,

        /// Show structure and bounds only
        #[arg(long)]
        template: bool,
    },

    /// Apply values to a grading method's leaves
    Grade {
        /// Grading method id
        #[arg(value_parser = parse_method_id)]
        id: Uuid,

        /// Values as `path=value`, e.g. `Production.Mixing=7.5`
        #[arg(value_name = "PATH=VALUE", value_parser = parse_grade_input)]
        values: Vec<GradeInput>,

        /// Read values from a JSON file (`-` for stdin)
        #[arg(long = "inputs", value_name = "FILE", conflicts_with = "values")]
        inputs_file: Option<String>,
    },

    /// List grading methods, newest first
    List {
        /// Only methods by this creator
        #[arg(long)]
        creator: Option<String>,

        /// Only public methods
        #[arg(long)]
        public: bool,
    },

    /// Delete a grading method
    Delete {
        /// Grading method id
        #[arg(value_parser = parse_method_id)]
        id: Uuid,
    },

    /// Print a grading method as a JSON document
    Export {
        /// Grading method id
        #[arg(value_parser = parse_method_id)]
        id: Uuid,
    },
}
