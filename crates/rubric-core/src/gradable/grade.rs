use crate::error::{RubricError, Result};

use super::normalize;

/// Relative tolerance used when checking step alignment
pub const STEP_TOLERANCE: f64 = 1e-9;

/// A single scored parameter with bounds and a step granularity
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    name: String,
    min: f64,
    max: f64,
    step: f64,
    description: Option<String>,
    current: Option<f64>,
}

impl Grade {
    /// Create an ungraded leaf. Fails when `min > max`, when `step` is negative,
    /// or when any bound is not finite.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        description: Option<String>,
    ) -> Result<Self> {
        let name = name.into();

        if !min.is_finite() || !max.is_finite() {
            return Err(RubricError::invalid_value(
                "bounds",
                format!("'{}' has non-finite bounds [{}, {}]", name, min, max),
            ));
        }
        if min > max {
            return Err(RubricError::InvalidBounds { name, min, max });
        }
        if !step.is_finite() || step < 0.0 {
            return Err(RubricError::invalid_value(
                "step",
                format!("'{}' has step {}", name, step),
            ));
        }

        Ok(Grade {
            name,
            min,
            max,
            step,
            description,
            current: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Current value, if one has been set
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    pub fn is_graded(&self) -> bool {
        self.current.is_some()
    }

    /// Set the current value after checking range and step alignment.
    /// On failure the previous value is left untouched.
    pub fn update_grade(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(RubricError::OutOfRange {
                name: self.name.clone(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        if !self.is_step_aligned(value) {
            return Err(RubricError::StepMisaligned {
                name: self.name.clone(),
                value,
                min: self.min,
                step: self.step,
            });
        }

        self.current = Some(value);
        Ok(())
    }

    /// Current value; fails with `Ungraded` when never set
    pub fn grade(&self) -> Result<f64> {
        self.current.ok_or_else(|| RubricError::Ungraded {
            name: self.name.clone(),
        })
    }

    /// Current value rescaled from `[min, max]` onto `[0, 10]`.
    ///
    /// A degenerate range (`min == max`) is always maximal and yields 10.
    pub fn normalized_grade(&self) -> Result<f64> {
        let value = self.grade()?;
        Ok(normalize(value, self.min, self.max))
    }

    fn is_step_aligned(&self, value: f64) -> bool {
        let offset = value - self.min;
        if self.step == 0.0 {
            return offset.abs() <= STEP_TOLERANCE;
        }

        let steps = offset / self.step;
        (steps - steps.round()).abs() <= STEP_TOLERANCE * steps.abs().max(1.0)
    }
}
