//! Read-only presentation of grading trees
//!
//! Views never fail on an incomplete tree. Ungraded leaves fold as zero, and
//! a figure that cannot be computed (a bound or value dividing by zero) is
//! reported as absent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::gradable::{
    normalize, Gradable, Grade, GradingBlock, GradingMethod, NodeKind, NORMALIZED_MAX,
};

/// Whole-method view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodView {
    pub id: Uuid,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    /// The root block; its name is the method's name
    #[serde(flatten)]
    pub root: NodeView,
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<NodeView>,
    /// Action symbols between consecutive components
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Template,
    Graded,
}

impl MethodView {
    /// Structure and bounds only
    pub fn template(method: &GradingMethod) -> Self {
        Self::build(method, Mode::Template)
    }

    /// Structure, bounds and current values
    pub fn graded(method: &GradingMethod) -> Self {
        Self::build(method, Mode::Graded)
    }

    fn build(method: &GradingMethod, mode: Mode) -> Self {
        MethodView {
            id: method.id(),
            creator_id: method.creator_id().to_string(),
            created_at: method.created_at(),
            is_public: method.is_public(),
            root: block_view(method.root(), mode),
        }
    }

    /// Root score on the 0 to 100 scale, if it can be computed
    pub fn percentage(&self) -> Option<f64> {
        self.root.normalized.map(percentage)
    }
}

impl NodeView {
    pub fn is_block(&self) -> bool {
        self.kind == NodeKind::Block
    }
}

fn node_view(node: &Gradable, mode: Mode) -> NodeView {
    match node {
        Gradable::Grade(grade) => grade_view(grade, mode),
        Gradable::Block(block) => block_view(block, mode),
    }
}

fn grade_view(grade: &Grade, mode: Mode) -> NodeView {
    let value = match mode {
        Mode::Template => None,
        Mode::Graded => grade.current(),
    };

    NodeView {
        name: grade.name().to_string(),
        kind: NodeKind::Grade,
        value,
        min: Some(grade.min()),
        max: Some(grade.max()),
        normalized: value.map(|v| normalize(v, grade.min(), grade.max())),
        step: Some(grade.step()),
        description: grade.description().map(str::to_string),
        components: Vec::new(),
        actions: Vec::new(),
    }
}

fn block_view(block: &GradingBlock, mode: Mode) -> NodeView {
    let min = block.min().ok();
    let max = block.max().ok();
    let value = match mode {
        Mode::Graded if has_any_value(block) => block.grade_or_zero().ok(),
        _ => None,
    };
    let normalized = match (value, min, max) {
        (Some(v), Some(lo), Some(hi)) => Some(normalize(v, lo, hi)),
        _ => None,
    };

    NodeView {
        name: block.name().to_string(),
        kind: NodeKind::Block,
        value,
        min,
        max,
        normalized,
        step: None,
        description: None,
        components: block
            .components()
            .iter()
            .map(|c| node_view(c, mode))
            .collect(),
        actions: block
            .actions()
            .iter()
            .map(|a| a.symbol().to_string())
            .collect(),
    }
}

/// A block with no graded leaf at all has no value to show
fn has_any_value(block: &GradingBlock) -> bool {
    block.components().iter().any(|c| match c {
        Gradable::Grade(grade) => grade.is_graded(),
        Gradable::Block(nested) => has_any_value(nested),
    })
}

/// Normalized `[0, 10]` value on the 0 to 100 scale
pub fn percentage(normalized: f64) -> f64 {
    normalized * 10.0
}

/// Normalized value as a star count, rounded to the nearest half star
pub fn stars(normalized: f64, max_stars: u8) -> f64 {
    round_half(normalized / NORMALIZED_MAX * f64::from(max_stars))
}

fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}
