use rusqlite::{params, Connection};

use crate::codec::relational::{self, ActionRow, ComponentLink, RelationalRows};
use crate::db::orphans::unlink_method;
use crate::error::{RubricError, Result};
use crate::gradable::GradingMethod;

impl super::super::Database {
    /// Persist a whole method, replacing any tree stored under the same id.
    ///
    /// Old component links are removed first and every node they leave
    /// unreferenced is deleted, all in the same transaction.
    #[tracing::instrument(skip(self, method), fields(method_id = %method.id()))]
    pub fn save_method(&self, method: &GradingMethod) -> Result<()> {
        method.validate()?;
        let rows = relational::encode(method);

        let tx = self.begin_write("save method")?;
        let removed = unlink_method(&tx, &rows.method.id.to_string())?;
        insert_rows(&tx, &rows)?;
        tx.commit()
            .map_err(|e| RubricError::transaction("save method", e))?;

        tracing::debug!(
            grades = rows.grades.len(),
            blocks = rows.blocks.len(),
            removed,
            "method saved"
        );
        Ok(())
    }
}

fn insert_rows(conn: &Connection, rows: &RelationalRows) -> Result<()> {
    let method = &rows.method;
    conn.execute(
        "INSERT INTO methods (id, name, creator_id, created_at, is_public) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            creator_id = excluded.creator_id,
            created_at = excluded.created_at,
            is_public = excluded.is_public",
        params![
            method.id.to_string(),
            method.name,
            method.creator_id,
            method.created_at.to_rfc3339(),
            method.is_public,
        ],
    )
    .map_err(|e| RubricError::Other(format!("failed to insert method {}: {}", method.id, e)))?;

    for grade in &rows.grades {
        conn.execute(
            "INSERT INTO grades (id, name, min, max, step, description, value) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                grade.id,
                grade.name,
                grade.min,
                grade.max,
                grade.step,
                grade.description,
                grade.value,
            ],
        )
        .map_err(|e| RubricError::Other(format!("failed to insert grade {}: {}", grade.name, e)))?;
    }

    for block in &rows.blocks {
        conn.execute(
            "INSERT INTO blocks (id, name) VALUES (?1, ?2)",
            params![block.id, block.name],
        )
        .map_err(|e| RubricError::Other(format!("failed to insert block {}: {}", block.name, e)))?;
    }

    insert_links(conn, "method_components", &rows.method_components)?;
    insert_links(conn, "block_components", &rows.block_components)?;
    insert_actions(conn, "method_actions", &rows.method_actions)?;
    insert_actions(conn, "block_actions", &rows.block_actions)?;

    Ok(())
}

fn insert_links(conn: &Connection, table: &str, links: &[ComponentLink]) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (parent_id, position, child_kind, child_id) VALUES (?1, ?2, ?3, ?4)",
        table
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| RubricError::Other(format!("failed to prepare {} insert: {}", table, e)))?;

    for link in links {
        stmt.execute(params![
            link.parent_id,
            link.position,
            link.child_kind.as_str(),
            link.child_id,
        ])
        .map_err(|e| {
            RubricError::Other(format!(
                "failed to insert {} row {}#{}: {}",
                table, link.parent_id, link.position, e
            ))
        })?;
    }
    Ok(())
}

fn insert_actions(conn: &Connection, table: &str, actions: &[ActionRow]) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (owner_id, position, action) VALUES (?1, ?2, ?3)",
        table
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| RubricError::Other(format!("failed to prepare {} insert: {}", table, e)))?;

    for row in actions {
        stmt.execute(params![row.owner_id, row.position, row.action.as_str()])
            .map_err(|e| {
                RubricError::Other(format!(
                    "failed to insert {} row {}#{}: {}",
                    table, row.owner_id, row.position, e
                ))
            })?;
    }
    Ok(())
}
