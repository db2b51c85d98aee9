use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;

use super::{Action, Gradable, GradingBlock};

/// A named, owned rubric: the root block of a grading tree plus identity
/// and visibility metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingMethod {
    id: Uuid,
    creator_id: String,
    created_at: DateTime<Utc>,
    is_public: bool,
    root: GradingBlock,
}

impl GradingMethod {
    /// Create an empty method with a fresh id and creation timestamp
    pub fn new(name: impl Into<String>, creator_id: impl Into<String>, is_public: bool) -> Self {
        GradingMethod {
            id: Uuid::new_v4(),
            creator_id: creator_id.into(),
            created_at: Utc::now(),
            is_public,
            root: GradingBlock::new(name),
        }
    }

    /// Rehydrate an empty method from persisted identity fields.
    ///
    /// Only persistence code and in-place updates use this; everything else
    /// goes through [`GradingMethod::new`].
    pub fn restore(
        id: Uuid,
        created_at: DateTime<Utc>,
        name: impl Into<String>,
        creator_id: impl Into<String>,
        is_public: bool,
    ) -> Self {
        GradingMethod {
            id,
            creator_id: creator_id.into(),
            created_at,
            is_public,
            root: GradingBlock::new(name),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// The root block holding the method's components and actions
    pub fn root(&self) -> &GradingBlock {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut GradingBlock {
        &mut self.root
    }

    pub fn components(&self) -> &[Gradable] {
        self.root.components()
    }

    pub fn actions(&self) -> &[Action] {
        self.root.actions()
    }

    pub fn add_grade(&mut self, component: impl Into<Gradable>) {
        self.root.add_grade(component);
    }

    pub fn add_action(&mut self, action: Action) {
        self.root.add_action(action);
    }

    pub fn validate(&self) -> Result<()> {
        self.root.validate()
    }

    pub fn grade(&self) -> Result<f64> {
        self.root.grade()
    }

    pub fn grade_or_zero(&self) -> Result<f64> {
        self.root.grade_or_zero()
    }

    pub fn min(&self) -> Result<f64> {
        self.root.min()
    }

    pub fn max(&self) -> Result<f64> {
        self.root.max()
    }

    pub fn normalized_grade(&self) -> Result<f64> {
        self.root.normalized_grade()
    }

    pub fn is_graded(&self) -> bool {
        self.root.is_graded()
    }
}
