mod delete;
mod read;
mod write;

use uuid::Uuid;

use crate::error::Result;
use crate::gradable::GradingMethod;
use crate::store::{MethodFilter, MethodRepository, MethodSummary};

impl MethodRepository for super::Database {
    fn save(&self, method: &GradingMethod) -> Result<()> {
        self.save_method(method)
    }

    fn load(&self, id: Uuid) -> Result<GradingMethod> {
        self.load_method(id)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.delete_method(id)
    }

    fn list(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>> {
        self.list_methods(filter)
    }
}
