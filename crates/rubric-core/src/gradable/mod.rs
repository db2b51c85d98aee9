//! Grading trees
//!
//! A grading tree is built from two node kinds: [`Grade`] leaves holding a
//! bounded, step-quantized value, and [`GradingBlock`] composites that fold
//! their ordered components with ordered [`Action`]s. A [`GradingMethod`] is
//! the named, owned root of such a tree.
//!
//! Every node answers the same four questions: current value, minimum,
//! maximum and normalized value on the canonical `[0, 10]` scale.

mod action;
mod block;
mod grade;
mod method;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RubricError, Result};

pub use action::Action;
pub use block::GradingBlock;
pub use grade::{Grade, STEP_TOLERANCE};
pub use method::GradingMethod;

/// Upper end of the canonical normalized scale
pub const NORMALIZED_MAX: f64 = 10.0;

/// Linear rescale of `value` from `[min, max]` onto `[0, 10]`.
///
/// A range with `max <= min` cannot be rescaled and counts as maximal.
/// Results are clamped because folded block bounds are endpoint folds and
/// may not enclose the folded value.
pub(crate) fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return NORMALIZED_MAX;
    }
    (NORMALIZED_MAX * (value - min) / (max - min)).clamp(0.0, NORMALIZED_MAX)
}

/// Discriminator for the two node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Grade,
    Block,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Grade => "grade",
            NodeKind::Block => "block",
        }
    }
}

impl FromStr for NodeKind {
    type Err = RubricError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "grade" => Ok(NodeKind::Grade),
            "block" => Ok(NodeKind::Block),
            other => Err(RubricError::integrity(format!(
                "unknown component kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any node of a grading tree
#[derive(Debug, Clone, PartialEq)]
pub enum Gradable {
    Grade(Grade),
    Block(GradingBlock),
}

impl Gradable {
    pub fn name(&self) -> &str {
        match self {
            Gradable::Grade(grade) => grade.name(),
            Gradable::Block(block) => block.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Gradable::Grade(_) => NodeKind::Grade,
            Gradable::Block(_) => NodeKind::Block,
        }
    }

    pub fn grade(&self) -> Result<f64> {
        match self {
            Gradable::Grade(grade) => grade.grade(),
            Gradable::Block(block) => block.grade(),
        }
    }

    pub fn grade_or_zero(&self) -> Result<f64> {
        match self {
            Gradable::Grade(grade) => Ok(grade.current().unwrap_or(0.0)),
            Gradable::Block(block) => block.grade_or_zero(),
        }
    }

    pub fn min(&self) -> Result<f64> {
        match self {
            Gradable::Grade(grade) => Ok(grade.min()),
            Gradable::Block(block) => block.min(),
        }
    }

    pub fn max(&self) -> Result<f64> {
        match self {
            Gradable::Grade(grade) => Ok(grade.max()),
            Gradable::Block(block) => block.max(),
        }
    }

    pub fn normalized_grade(&self) -> Result<f64> {
        match self {
            Gradable::Grade(grade) => grade.normalized_grade(),
            Gradable::Block(block) => block.normalized_grade(),
        }
    }

    pub fn is_graded(&self) -> bool {
        match self {
            Gradable::Grade(grade) => grade.is_graded(),
            Gradable::Block(block) => block.is_graded(),
        }
    }

    pub fn as_grade(&self) -> Option<&Grade> {
        match self {
            Gradable::Grade(grade) => Some(grade),
            Gradable::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&GradingBlock> {
        match self {
            Gradable::Block(block) => Some(block),
            Gradable::Grade(_) => None,
        }
    }
}

impl From<Grade> for Gradable {
    fn from(grade: Grade) -> Self {
        Gradable::Grade(grade)
    }
}

impl From<GradingBlock> for Gradable {
    fn from(block: GradingBlock) -> Self {
        Gradable::Block(block)
    }
}
