use crate::error::{RubricError, Result};

use super::{normalize, Action, Gradable};

/// Composite node combining ordered components with ordered actions.
///
/// `actions[i]` combines the running fold with `components[i + 1]`, so a
/// finished block always has exactly one action fewer than components. The
/// count is only enforced by [`GradingBlock::validate`] and at evaluation
/// time, which lets callers append components and actions incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingBlock {
    name: String,
    components: Vec<Gradable>,
    actions: Vec<Action>,
}

impl GradingBlock {
    pub fn new(name: impl Into<String>) -> Self {
        GradingBlock {
            name: name.into(),
            components: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Gradable] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Gradable] {
        &mut self.components
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Append a component (a grade or a nested block)
    pub fn add_grade(&mut self, component: impl Into<Gradable>) {
        self.components.push(component.into());
    }

    /// Append an operator
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Check that this block and every nested block is non-empty and has
    /// exactly `components - 1` actions.
    pub fn validate(&self) -> Result<()> {
        self.check_shape()?;
        for component in &self.components {
            if let Gradable::Block(block) = component {
                block.validate()?;
            }
        }
        Ok(())
    }

    /// Folded value of all components. Fails if any leaf is ungraded.
    pub fn grade(&self) -> Result<f64> {
        self.fold(Gradable::grade)
    }

    /// Folded value treating ungraded leaves as 0
    pub fn grade_or_zero(&self) -> Result<f64> {
        self.fold(Gradable::grade_or_zero)
    }

    /// Fold of the components' minimums using the same action sequence as the value.
    ///
    /// This is exact for `Add`; for `Subtract`, `Multiply` and `Divide` the
    /// endpoint fold is not the true interval bound.
    pub fn min(&self) -> Result<f64> {
        self.fold(Gradable::min)
    }

    /// Fold of the components' maximums, see [`GradingBlock::min`]
    pub fn max(&self) -> Result<f64> {
        self.fold(Gradable::max)
    }

    /// Folded value rescaled onto `[0, 10]` using the folded bounds
    pub fn normalized_grade(&self) -> Result<f64> {
        let value = self.grade()?;
        Ok(normalize(value, self.min()?, self.max()?))
    }

    /// Whether every leaf below this block has a value
    pub fn is_graded(&self) -> bool {
        self.components.iter().all(Gradable::is_graded)
    }

    /// Number of leaves below this block
    pub fn leaf_count(&self) -> usize {
        self.components
            .iter()
            .map(|component| match component {
                Gradable::Grade(_) => 1,
                Gradable::Block(block) => block.leaf_count(),
            })
            .sum()
    }

    fn check_shape(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(RubricError::EmptyBlock {
                name: self.name.clone(),
            });
        }
        if self.actions.len() + 1 != self.components.len() {
            return Err(RubricError::ActionCountMismatch {
                name: self.name.clone(),
                children: self.components.len(),
                actions: self.actions.len(),
            });
        }
        Ok(())
    }

    fn fold<F>(&self, value_of: F) -> Result<f64>
    where
        F: Fn(&Gradable) -> Result<f64>,
    {
        self.check_shape()?;

        let (first, rest) = self
            .components
            .split_first()
            .ok_or_else(|| RubricError::EmptyBlock {
                name: self.name.clone(),
            })?;

        let mut acc = value_of(first)?;
        for (action, component) in self.actions.iter().zip(rest) {
            let rhs = value_of(component)?;
            acc = action
                .apply(acc, rhs)
                .ok_or_else(|| RubricError::DivisionByZero {
                    name: self.name.clone(),
                })?;
        }
        Ok(acc)
    }
}
