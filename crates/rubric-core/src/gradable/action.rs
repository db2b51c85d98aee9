use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RubricError;

/// Arithmetic operator combining the running fold with the next component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Add,
        Action::Subtract,
        Action::Multiply,
        Action::Divide,
    ];

    /// Apply the operator. Returns `None` when dividing by zero.
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Action::Add => Some(lhs + rhs),
            Action::Subtract => Some(lhs - rhs),
            Action::Multiply => Some(lhs * rhs),
            Action::Divide if rhs == 0.0 => None,
            Action::Divide => Some(lhs / rhs),
        }
    }

    /// Stable tag used by both persistence formats
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Subtract => "SUBTRACT",
            Action::Multiply => "MULTIPLY",
            Action::Divide => "DIVIDE",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Add => '+',
            Action::Subtract => '-',
            Action::Multiply => '*',
            Action::Divide => '/',
        }
    }
}

impl FromStr for Action {
    type Err = RubricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADD" | "+" => Ok(Action::Add),
            "SUBTRACT" | "-" => Ok(Action::Subtract),
            "MULTIPLY" | "*" => Ok(Action::Multiply),
            "DIVIDE" | "/" => Ok(Action::Divide),
            _ => Err(RubricError::invalid_value("action", s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
