//! `rubric grade` command - apply values to a method's leaves
//!
//! Values that apply cleanly are persisted even when others are rejected;
//! the command then reports the problems and exits with a validation code.

use serde::Deserialize;
use uuid::Uuid;

use rubric_core::error::{RubricError, Result};
use rubric_core::grader::{GradeInput, GradeRequest, GradingOutcome};
use rubric_core::view::MethodView;

use crate::cli::OutputFormat;
use crate::commands::dispatch::{read_input, CommandContext};
use crate::commands::render;

/// Accepted shapes of an inputs file
#[derive(Deserialize)]
#[serde(untagged)]
enum InputsFile {
    List(Vec<GradeInput>),
    Request { inputs: Vec<GradeInput> },
}

/// Execute the grade command
pub fn execute(
    ctx: &CommandContext,
    id: Uuid,
    values: &[GradeInput],
    inputs_file: Option<&str>,
) -> Result<()> {
    let inputs = match inputs_file {
        Some(path) => load_inputs(path)?,
        None => values.to_vec(),
    };

    let store = ctx.discover_or_open_store()?;
    let (method, outcome) = store.apply_grades(&GradeRequest {
        grading_method_id: id,
        inputs,
    })?;
    let view = MethodView::graded(&method);

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": outcome.success(),
                "outcome": &outcome,
                "method": &view,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Applied {} value(s) to {}",
                    outcome.applied.len(),
                    view.root.name
                );
                render::print_outcome(&outcome);
                println!();
            }
            render::print_method(&view, &store.config().display);
        }
    }

    if outcome.success() {
        Ok(())
    } else {
        Err(RubricError::invalid_value("grade inputs", incomplete_summary(&outcome)))
    }
}

fn load_inputs(path: &str) -> Result<Vec<GradeInput>> {
    let parsed: InputsFile = serde_json::from_str(&read_input(path)?)
        .map_err(|e| RubricError::invalid_value("grade inputs file", e))?;
    Ok(match parsed {
        InputsFile::List(inputs) | InputsFile::Request { inputs } => inputs,
    })
}

fn incomplete_summary(outcome: &GradingOutcome) -> String {
    format!(
        "grading incomplete: {} unmatched leaf(s), {} unconsumed input(s), {} rejected value(s)",
        outcome.unmatched_leaves.len(),
        outcome.unconsumed_inputs.len(),
        outcome.failures.len()
    )
}
