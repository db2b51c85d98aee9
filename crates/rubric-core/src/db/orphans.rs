//! Orphan cleanup for the relational backend
//!
//! A grade or block row is live while a method link, a block link or a
//! rating root points at it. Removing the last reference deletes the node,
//! and a deleted block releases its own children in turn.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{RubricError, Result};
use crate::gradable::NodeKind;
use crate::map_db_err;

/// Drop a method's component and action links and delete every node left
/// unreferenced. Returns the number of grade and block rows removed.
pub(crate) fn unlink_method(conn: &Connection, method_id: &str) -> Result<usize> {
    let children = child_links(conn, "method_components", method_id)?;

    conn.execute(
        "DELETE FROM method_components WHERE parent_id = ?1",
        params![method_id],
    )
    .map_err(|e| map_db_err!("delete method components", e))?;
    conn.execute(
        "DELETE FROM method_actions WHERE owner_id = ?1",
        params![method_id],
    )
    .map_err(|e| map_db_err!("delete method actions", e))?;

    let mut removed = 0;
    for (kind, id) in children {
        removed += remove_if_orphaned(conn, kind, &id)?;
    }
    Ok(removed)
}

/// Delete a node if nothing references it any more.
///
/// The reference check and the delete are one statement, so calling this
/// on a node that is still shared or already gone is a no-op.
pub(crate) fn remove_if_orphaned(conn: &Connection, kind: NodeKind, id: &str) -> Result<usize> {
    let table = match kind {
        NodeKind::Grade => "grades",
        NodeKind::Block => "blocks",
    };
    let sql = format!(
        "DELETE FROM {table} WHERE id = ?1
           AND NOT EXISTS (SELECT 1 FROM method_components WHERE child_kind = ?2 AND child_id = ?1)
           AND NOT EXISTS (SELECT 1 FROM block_components WHERE child_kind = ?2 AND child_id = ?1)
           AND NOT EXISTS (SELECT 1 FROM rating_roots WHERE child_kind = ?2 AND child_id = ?1)"
    );
    let deleted = conn
        .execute(&sql, params![id, kind.as_str()])
        .map_err(|e| map_db_err!("delete orphaned node", e))?;

    if deleted == 0 || kind == NodeKind::Grade {
        return Ok(deleted);
    }

    let children = child_links(conn, "block_components", id)?;
    conn.execute(
        "DELETE FROM block_components WHERE parent_id = ?1",
        params![id],
    )
    .map_err(|e| map_db_err!("delete block components", e))?;
    conn.execute("DELETE FROM block_actions WHERE owner_id = ?1", params![id])
        .map_err(|e| map_db_err!("delete block actions", e))?;

    let mut removed = deleted;
    for (child_kind, child_id) in children {
        removed += remove_if_orphaned(conn, child_kind, &child_id)?;
    }
    Ok(removed)
}

fn child_links(conn: &Connection, table: &str, parent_id: &str) -> Result<Vec<(NodeKind, String)>> {
    let sql = format!(
        "SELECT child_kind, child_id FROM {} WHERE parent_id = ?1 ORDER BY position",
        table
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| map_db_err!("prepare child query", e))?;
    let raw = stmt
        .query_map(params![parent_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| map_db_err!("execute child query", e))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read child rows", e))?;

    raw.into_iter()
        .map(|(kind, id)| Ok((kind.parse::<NodeKind>()?, id)))
        .collect()
}

fn node_exists(conn: &Connection, kind: NodeKind, id: &str) -> Result<bool> {
    let sql = match kind {
        NodeKind::Grade => "SELECT EXISTS(SELECT 1 FROM grades WHERE id = ?1)",
        NodeKind::Block => "SELECT EXISTS(SELECT 1 FROM blocks WHERE id = ?1)",
    };
    conn.query_row(sql, params![id], |r| r.get(0))
        .map_err(|e| map_db_err!("check node existence", e))
}

impl super::Database {
    /// Make a stored grade or block a direct child of a rating.
    ///
    /// A rating owns at most one root; attaching a new one releases the
    /// previous root, which is deleted if nothing else references it.
    #[tracing::instrument(skip(self))]
    pub fn attach_rating_root(&self, rating_id: &str, kind: NodeKind, node_id: &str) -> Result<()> {
        let tx = self.begin_write("attach rating root")?;

        if !node_exists(&tx, kind, node_id)? {
            return Err(RubricError::not_found(kind.as_str(), node_id));
        }

        let previous = rating_root(&tx, rating_id)?;
        tx.execute(
            "INSERT OR REPLACE INTO rating_roots (rating_id, child_kind, child_id) VALUES (?1, ?2, ?3)",
            params![rating_id, kind.as_str(), node_id],
        )
        .map_err(|e| map_db_err!("insert rating root", e))?;

        let mut removed = 0;
        if let Some((old_kind, old_id)) = previous {
            removed = remove_if_orphaned(&tx, old_kind, &old_id)?;
        }

        tx.commit()
            .map_err(|e| RubricError::transaction("attach rating root", e))?;
        tracing::debug!(removed, "rating root attached");
        Ok(())
    }

    /// Release a rating's root. Returns false if the rating had none.
    #[tracing::instrument(skip(self))]
    pub fn detach_rating_root(&self, rating_id: &str) -> Result<bool> {
        let tx = self.begin_write("detach rating root")?;

        let Some((kind, id)) = rating_root(&tx, rating_id)? else {
            return Ok(false);
        };
        tx.execute(
            "DELETE FROM rating_roots WHERE rating_id = ?1",
            params![rating_id],
        )
        .map_err(|e| map_db_err!("delete rating root", e))?;
        let removed = remove_if_orphaned(&tx, kind, &id)?;

        tx.commit()
            .map_err(|e| RubricError::transaction("detach rating root", e))?;
        tracing::debug!(removed, "rating root detached");
        Ok(true)
    }

    /// Delete every grade and block that no method, block or rating points
    /// at. Returns the number of rows removed.
    pub fn purge_orphans(&self) -> Result<usize> {
        let tx = self.begin_write("purge orphans")?;

        let mut candidates = Vec::new();
        for (kind, table) in [(NodeKind::Block, "blocks"), (NodeKind::Grade, "grades")] {
            let mut stmt = tx
                .prepare(&format!("SELECT id FROM {}", table))
                .map_err(|e| map_db_err!("prepare orphan scan", e))?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| map_db_err!("scan nodes", e))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| map_db_err!("read node ids", e))?;
            candidates.extend(ids.into_iter().map(|id| (kind, id)));
        }

        let mut removed = 0;
        for (kind, id) in candidates {
            removed += remove_if_orphaned(&tx, kind, &id)?;
        }

        tx.commit()
            .map_err(|e| RubricError::transaction("purge orphans", e))?;
        if removed > 0 {
            tracing::info!(removed, "orphaned nodes purged");
        }
        Ok(removed)
    }
}

fn rating_root(conn: &Connection, rating_id: &str) -> Result<Option<(NodeKind, String)>> {
    let raw = conn
        .query_row(
            "SELECT child_kind, child_id FROM rating_roots WHERE rating_id = ?1",
            params![rating_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(|e| map_db_err!("query rating root", e))?;

    raw.map(|(kind, id)| Ok((kind.parse::<NodeKind>()?, id)))
        .transpose()
}
