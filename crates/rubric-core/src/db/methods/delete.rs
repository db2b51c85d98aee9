use rusqlite::params;
use uuid::Uuid;

use crate::db::orphans::unlink_method;
use crate::error::{RubricError, Result};
use crate::map_db_err;

impl super::super::Database {
    /// Delete a method and every node only it referenced
    #[tracing::instrument(skip(self))]
    pub fn delete_method(&self, id: Uuid) -> Result<()> {
        let tx = self.begin_write("delete method")?;
        let method_id = id.to_string();

        let exists: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM methods WHERE id = ?1)",
                params![method_id],
                |r| r.get(0),
            )
            .map_err(|e| map_db_err!("check method existence", e))?;
        if !exists {
            return Err(RubricError::not_found("grading method", id));
        }

        let removed = unlink_method(&tx, &method_id)?;
        tx.execute("DELETE FROM methods WHERE id = ?1", params![method_id])
            .map_err(|e| map_db_err!("delete method", e))?;

        tx.commit()
            .map_err(|e| RubricError::transaction("delete method", e))?;
        tracing::debug!(removed, "method deleted");
        Ok(())
    }
}
