//! Applying externally supplied values to a grading tree by path
//!
//! A leaf's path is the dot-joined chain of block names from the first
//! level below the method down to the leaf's own name, e.g.
//! `Production.Mixing`. The method's own name is not part of the path.
//! Paths are matched case-insensitively.
//!
//! Grading is not atomic: values that apply cleanly stay applied even when
//! other leaves are unmatched or rejected. Callers that need all-or-nothing
//! semantics must clone the method first and discard the clone on failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::gradable::{Gradable, GradingBlock, GradingMethod};

/// Path separator between block and leaf names
pub const PATH_SEPARATOR: char = '.';

/// A value addressed to one leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeInput {
    pub path: String,
    pub value: f64,
}

impl GradeInput {
    pub fn new(path: impl Into<String>, value: f64) -> Self {
        GradeInput {
            path: path.into(),
            value,
        }
    }
}

/// Grade-application request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    #[serde(alias = "gradingMethodId")]
    pub grading_method_id: Uuid,
    pub inputs: Vec<GradeInput>,
}

/// An input that matched a leaf but was rejected by it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeFailure {
    pub path: String,
    pub value: f64,
    /// Error type identifier, e.g. `out_of_range`
    pub error: String,
    pub message: String,
}

/// Result of applying a set of inputs to a tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradingOutcome {
    /// Paths of leaves that received a value
    pub applied: Vec<String>,
    /// Paths of leaves no input matched
    pub unmatched_leaves: Vec<String>,
    /// Inputs that matched no leaf (or a leaf already taken by an earlier input)
    pub unconsumed_inputs: Vec<GradeInput>,
    /// Inputs that matched a leaf whose update was rejected
    pub failures: Vec<GradeFailure>,
}

impl GradingOutcome {
    /// Every leaf matched, every input consumed and every update accepted
    pub fn success(&self) -> bool {
        self.unmatched_leaves.is_empty()
            && self.unconsumed_inputs.is_empty()
            && self.failures.is_empty()
    }
}

/// Apply `inputs` to the leaves of `method`.
///
/// Only a malformed tree is a hard error; mismatches and rejected values are
/// reported in the returned outcome.
pub fn apply_grades(method: &mut GradingMethod, inputs: &[GradeInput]) -> Result<GradingOutcome> {
    method.validate()?;

    let mut grader = PathGrader::new(inputs);
    grader.visit(method.root_mut(), "");
    let outcome = grader.finish();

    tracing::debug!(
        method_id = %method.id(),
        applied = outcome.applied.len(),
        unmatched = outcome.unmatched_leaves.len(),
        unconsumed = outcome.unconsumed_inputs.len(),
        failed = outcome.failures.len(),
        "apply_grades"
    );
    Ok(outcome)
}

/// Paths of every leaf below `block`, in depth-first order
pub fn leaf_paths(block: &GradingBlock) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(block, "", &mut paths);
    paths
}

fn collect_paths(block: &GradingBlock, prefix: &str, paths: &mut Vec<String>) {
    for component in block.components() {
        let path = join_path(prefix, component.name());
        match component {
            Gradable::Grade(_) => paths.push(path),
            Gradable::Block(nested) => collect_paths(nested, &path, paths),
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, name)
    }
}

struct PathGrader<'a> {
    inputs: &'a [GradeInput],
    keys: Vec<String>,
    consumed: Vec<bool>,
    outcome: GradingOutcome,
}

impl<'a> PathGrader<'a> {
    fn new(inputs: &'a [GradeInput]) -> Self {
        PathGrader {
            inputs,
            keys: inputs.iter().map(|i| i.path.to_lowercase()).collect(),
            consumed: vec![false; inputs.len()],
            outcome: GradingOutcome::default(),
        }
    }

    fn visit(&mut self, block: &mut GradingBlock, prefix: &str) {
        for component in block.components_mut() {
            let path = join_path(prefix, component.name());
            match component {
                Gradable::Grade(grade) => {
                    let Some(index) = self.take_input(&path) else {
                        self.outcome.unmatched_leaves.push(path);
                        continue;
                    };

                    let inputs = self.inputs;
                    let input = &inputs[index];
                    match grade.update_grade(input.value) {
                        Ok(()) => self.outcome.applied.push(path),
                        Err(e) => self.outcome.failures.push(GradeFailure {
                            path,
                            value: input.value,
                            error: e.error_type().to_string(),
                            message: e.to_string(),
                        }),
                    }
                }
                Gradable::Block(nested) => self.visit(nested, &path),
            }
        }
    }

    fn take_input(&mut self, path: &str) -> Option<usize> {
        let key = path.to_lowercase();
        let index = self
            .keys
            .iter()
            .enumerate()
            .position(|(i, k)| !self.consumed[i] && *k == key)?;
        self.consumed[index] = true;
        Some(index)
    }

    fn finish(mut self) -> GradingOutcome {
        self.outcome.unconsumed_inputs = self
            .inputs
            .iter()
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(input, _)| input.clone())
            .collect();
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_method, CreateMethodRequest};
    use crate::error::RubricError;
    use crate::gradable::{Action, Grade};

    fn album() -> GradingMethod {
        let request = CreateMethodRequest::from_json(
            r#"{
                "name": "Album",
                "creatorId": "user-1",
                "components": [
                    { "type": "grade", "name": "Lyrics", "min": 1, "max": 10, "step": 0.5 },
                    { "type": "block", "name": "Production", "subComponents": [
                        { "type": "grade", "name": "Mixing", "min": 1, "max": 10, "step": 0.5 },
                        { "type": "grade", "name": "Mastering", "min": 1, "max": 10, "step": 0.5 }
                    ], "actions": ["ADD"] }
                ],
                "actions": ["ADD"]
            }"#,
        )
        .unwrap();
        build_method(&request).unwrap()
    }

    fn leaf<'a>(method: &'a GradingMethod, path: &[usize]) -> &'a Grade {
        let mut block = method.root();
        let (last, parents) = path.split_last().unwrap();
        for i in parents {
            block = block.components()[*i].as_block().unwrap();
        }
        block.components()[*last].as_grade().unwrap()
    }

    #[test]
    fn test_leaf_paths_skip_method_name() {
        let method = album();
        assert_eq!(
            leaf_paths(method.root()),
            vec!["Lyrics", "Production.Mixing", "Production.Mastering"]
        );
    }

    #[test]
    fn test_complete_inputs_succeed() {
        let mut method = album();
        let inputs = vec![
            GradeInput::new("Lyrics", 8.0),
            GradeInput::new("Production.Mixing", 6.0),
            GradeInput::new("Production.Mastering", 9.0),
        ];

        let outcome = apply_grades(&mut method, &inputs).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.applied.len(), 3);
        assert_eq!(leaf(&method, &[0]).grade().unwrap(), 8.0);
        assert_eq!(leaf(&method, &[1, 0]).grade().unwrap(), 6.0);
        assert_eq!(leaf(&method, &[1, 1]).grade().unwrap(), 9.0);
        assert_eq!(method.grade().unwrap(), 23.0);
    }

    #[test]
    fn test_paths_match_case_insensitively() {
        let mut method = album();
        let inputs = vec![
            GradeInput::new("lyrics", 8.0),
            GradeInput::new("PRODUCTION.mixing", 6.0),
            GradeInput::new("production.Mastering", 9.0),
        ];
        assert!(apply_grades(&mut method, &inputs).unwrap().success());
    }

    #[test]
    fn test_missing_input_is_partial() {
        let mut method = album();
        let inputs = vec![
            GradeInput::new("Lyrics", 8.0),
            GradeInput::new("Production.Mixing", 6.0),
        ];

        let outcome = apply_grades(&mut method, &inputs).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.unmatched_leaves, vec!["Production.Mastering"]);
        assert_eq!(leaf(&method, &[0]).grade().unwrap(), 8.0);
        assert_eq!(leaf(&method, &[1, 0]).grade().unwrap(), 6.0);
        assert!(!leaf(&method, &[1, 1]).is_graded());
    }

    #[test]
    fn test_extra_and_duplicate_inputs_are_unconsumed() {
        let mut method = album();
        let inputs = vec![
            GradeInput::new("Lyrics", 8.0),
            GradeInput::new("Lyrics", 9.0),
            GradeInput::new("Production.Mixing", 6.0),
            GradeInput::new("Production.Mastering", 9.0),
            GradeInput::new("Mixing", 6.0),
        ];

        let outcome = apply_grades(&mut method, &inputs).unwrap();
        assert!(!outcome.success());
        assert!(outcome.unmatched_leaves.is_empty());
        assert_eq!(
            outcome.unconsumed_inputs,
            vec![GradeInput::new("Lyrics", 9.0), GradeInput::new("Mixing", 6.0)]
        );
        assert_eq!(leaf(&method, &[0]).grade().unwrap(), 8.0);
    }

    #[test]
    fn test_rejected_value_does_not_roll_back_others() {
        let mut method = album();
        let inputs = vec![
            GradeInput::new("Lyrics", 8.0),
            GradeInput::new("Production.Mixing", 11.0),
            GradeInput::new("Production.Mastering", 6.3),
        ];

        let outcome = apply_grades(&mut method, &inputs).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.applied, vec!["Lyrics"]);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].error, "out_of_range");
        assert_eq!(outcome.failures[1].error, "step_misaligned");
        assert!(outcome.unconsumed_inputs.is_empty());
        assert_eq!(leaf(&method, &[0]).grade().unwrap(), 8.0);
    }

    #[test]
    fn test_regrading_overwrites_previous_values() {
        let mut method = album();
        apply_grades(&mut method, &[GradeInput::new("Lyrics", 8.0)]).unwrap();
        apply_grades(&mut method, &[GradeInput::new("Lyrics", 3.0)]).unwrap();
        assert_eq!(leaf(&method, &[0]).grade().unwrap(), 3.0);
    }

    #[test]
    fn test_malformed_tree_is_hard_failure() {
        let mut method = GradingMethod::new("Broken", "user-1", false);
        method.add_grade(Grade::new("a", 0.0, 1.0, 1.0, None).unwrap());
        method.add_action(Action::Add);

        let err = apply_grades(&mut method, &[GradeInput::new("a", 1.0)]).unwrap_err();
        assert!(matches!(err, RubricError::ActionCountMismatch { .. }));
    }

    #[test]
    fn test_request_accepts_camel_case() {
        let request: GradeRequest = serde_json::from_str(
            r#"{ "gradingMethodId": "6f1c1d52-2f55-4a8e-8f3a-0d9e0f6f7a11",
                 "inputs": [{ "path": "Lyrics", "value": 8 }] }"#,
        )
        .unwrap();
        assert_eq!(request.inputs, vec![GradeInput::new("Lyrics", 8.0)]);
    }
}
