//! Human-readable rendering of grading methods

use rubric_core::config::DisplayConfig;
use rubric_core::error::Result;
use rubric_core::format::{format_number, format_percentage, format_stars};
use rubric_core::gradable::GradingMethod;
use rubric_core::grader::GradingOutcome;
use rubric_core::store::Store;
use rubric_core::view::{MethodView, NodeView};

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;

/// Report a created or updated method
pub fn print_saved(
    ctx: &CommandContext,
    store: &Store,
    method: &GradingMethod,
    verb: &str,
) -> Result<()> {
    let view = MethodView::graded(method);
    match ctx.cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Human => {
            if ctx.cli.quiet {
                println!("{}", method.id());
            } else {
                println!("{} grading method {}", verb, method.id());
                print_method(&view, &store.config().display);
            }
        }
    }
    Ok(())
}

/// Print a method header followed by its tree
pub fn print_method(view: &MethodView, display: &DisplayConfig) {
    println!(
        "{}  by {}{}",
        view.root.name,
        view.creator_id,
        if view.is_public { "  (public)" } else { "" }
    );
    println!("  id: {}", view.id);
    println!("  score: {}", score_line(&view.root, display));
    for (i, child) in view.root.components.iter().enumerate() {
        print_node(child, action_before(&view.root, i), 1, display);
    }
}

fn print_node(node: &NodeView, action: &str, depth: usize, display: &DisplayConfig) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{}{}  {}",
        indent,
        action,
        node.name,
        node_figures(node, display.precision)
    );
    if let Some(description) = &node.description {
        println!("{}    {}", indent, description);
    }
    for (i, child) in node.components.iter().enumerate() {
        print_node(child, action_before(node, i), depth + 1, display);
    }
}

/// Symbol prefix for the i-th component: none for the first
fn action_before(parent: &NodeView, i: usize) -> &str {
    match i.checked_sub(1).and_then(|j| parent.actions.get(j)) {
        Some(symbol) => match symbol.as_str() {
            "+" => "+ ",
            "-" => "- ",
            "*" => "* ",
            "/" => "/ ",
            _ => "",
        },
        None => "",
    }
}

fn node_figures(node: &NodeView, precision: usize) -> String {
    let number = |v: Option<f64>| v.map_or_else(|| "?".to_string(), |v| format_number(v, precision));
    let range = format!("[{}..{}]", number(node.min), number(node.max));

    let mut parts = Vec::new();
    if let Some(value) = node.value {
        parts.push(format_number(value, precision));
    } else if !node.is_block() {
        parts.push("-".to_string());
    }
    parts.push(range);
    if let Some(step) = node.step {
        parts.push(format!("step {}", format_number(step, precision)));
    }
    parts.join(" ")
}

fn score_line(root: &NodeView, display: &DisplayConfig) -> String {
    let (Some(value), Some(normalized)) = (root.value, root.normalized) else {
        return format!(
            "ungraded, range {}..{}",
            root.min.map_or("?".to_string(), |v| format_number(v, display.precision)),
            root.max.map_or("?".to_string(), |v| format_number(v, display.precision)),
        );
    };

    format!(
        "{} of {}  ({}/10, {}, {})",
        format_number(value, display.precision),
        root.max.map_or("?".to_string(), |v| format_number(v, display.precision)),
        format_number(normalized, display.precision),
        format_percentage(normalized, display.precision),
        format_stars(normalized, display.stars)
    )
}

/// Print the problems of a partial grading
pub fn print_outcome(outcome: &GradingOutcome) {
    for path in &outcome.unmatched_leaves {
        println!("  not graded: {}", path);
    }
    for input in &outcome.unconsumed_inputs {
        println!("  unused input: {}={}", input.path, input.value);
    }
    for failure in &outcome.failures {
        println!("  rejected: {}={} ({})", failure.path, failure.value, failure.message);
    }
}
