//! Persistence seam shared by both backends

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::codec::document::MethodDocument;
use crate::codec::relational::MethodRow;
use crate::error::Result;
use crate::gradable::GradingMethod;

/// Whole-tree persistence of grading methods.
///
/// `save` replaces any tree stored under the same id; concurrent saves of
/// one method resolve as last writer wins.
pub trait MethodRepository {
    fn save(&self, method: &GradingMethod) -> Result<()>;
    fn load(&self, id: Uuid) -> Result<GradingMethod>;
    fn delete(&self, id: Uuid) -> Result<()>;
    fn list(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>>;
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    pub creator_id: Option<String>,
    pub public_only: bool,
}

impl MethodFilter {
    pub fn matches(&self, summary: &MethodSummary) -> bool {
        if self.public_only && !summary.is_public {
            return false;
        }
        match &self.creator_id {
            Some(creator_id) => &summary.creator_id == creator_id,
            None => true,
        }
    }
}

/// Root metadata of a stored method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub id: Uuid,
    pub name: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl From<&GradingMethod> for MethodSummary {
    fn from(method: &GradingMethod) -> Self {
        MethodSummary {
            id: method.id(),
            name: method.name().to_string(),
            creator_id: method.creator_id().to_string(),
            created_at: method.created_at(),
            is_public: method.is_public(),
        }
    }
}

impl From<MethodRow> for MethodSummary {
    fn from(row: MethodRow) -> Self {
        MethodSummary {
            id: row.id,
            name: row.name,
            creator_id: row.creator_id,
            created_at: row.created_at,
            is_public: row.is_public,
        }
    }
}

impl From<&MethodDocument> for MethodSummary {
    fn from(document: &MethodDocument) -> Self {
        MethodSummary {
            id: document.id,
            name: document.name.clone(),
            creator_id: document.creator_id.clone(),
            created_at: document.created_at,
            is_public: document.is_public,
        }
    }
}

/// Newest first, ties broken by id
pub(crate) fn sort_summaries(summaries: &mut [MethodSummary]) {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}
