//! Rubric - hierarchical grading methods from the command line
//!
//! Build grading trees from JSON requests, apply values by path and keep
//! the results in a local store.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::{Cli, OutputFormat};
use rubric_core::error::{ExitCode as RubricExitCode, RubricError};
use rubric_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if argv_requests_json() => return exit_with(&parse_failure(err), true),
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    let result = commands::dispatch::run(&cli, start);
    tracing::debug!(elapsed = ?start.elapsed(), "total");

    match result {
        Ok(()) => ExitCode::from(RubricExitCode::Success as u8),
        Err(e) if cli.quiet && cli.format != OutputFormat::Json => {
            ExitCode::from(e.exit_code() as u8)
        }
        Err(e) => exit_with(&e, cli.format == OutputFormat::Json),
    }
}

/// Report an error on stderr and turn it into the process exit code
fn exit_with(error: &RubricError, json: bool) -> ExitCode {
    if json {
        eprintln!("{}", error.to_json());
    } else {
        eprintln!("error: {}", error);
    }
    ExitCode::from(error.exit_code() as u8)
}

/// Classify a clap failure seen while JSON output was requested.
///
/// Help and version output are not failures and exit through clap.
fn parse_failure(err: clap::Error) -> RubricError {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => RubricError::UsageError(err.to_string()),
        _ => RubricError::Other(err.to_string()),
    }
}

/// `--format` is global, so a parse failure may happen before clap has
/// read it. Look for it in the raw arguments instead.
fn argv_requests_json() -> bool {
    let args: Vec<String> = env::args().skip(1).collect();
    args.iter().enumerate().any(|(i, arg)| {
        arg == "--format=json"
            || (arg == "--format" && args.get(i + 1).is_some_and(|v| v == "json"))
    })
}
