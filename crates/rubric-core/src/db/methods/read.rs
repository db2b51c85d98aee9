use std::collections::{HashSet, VecDeque};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::codec::relational::{
    self, ActionRow, BlockRow, ComponentLink, GradeRow, MethodRow, RelationalRows,
};
use crate::error::{RubricError, Result};
use crate::gradable::{Action, GradingMethod, NodeKind};
use crate::map_db_err;
use crate::store::repository::sort_summaries;
use crate::store::{MethodFilter, MethodSummary};

impl super::super::Database {
    /// Load and rebuild a method
    #[tracing::instrument(skip(self))]
    pub fn load_method(&self, id: Uuid) -> Result<GradingMethod> {
        let rows = self.load_rows(id)?;
        relational::decode(&rows)
    }

    /// Load every row reachable from a method, starting at its component
    /// links and following block links breadth-first.
    pub fn load_rows(&self, id: Uuid) -> Result<RelationalRows> {
        let tx = self.begin_read("load method")?;
        let method_id = id.to_string();

        let method = load_method_row(&tx, &method_id)?
            .ok_or_else(|| RubricError::not_found("grading method", id))?;

        let mut rows = RelationalRows {
            method,
            grades: Vec::new(),
            blocks: Vec::new(),
            method_components: load_links(&tx, "method_components", &method_id)?,
            block_components: Vec::new(),
            method_actions: load_actions(&tx, "method_actions", &method_id)?,
            block_actions: Vec::new(),
        };

        let mut pending: VecDeque<(NodeKind, String)> = rows
            .method_components
            .iter()
            .map(|link| (link.child_kind, link.child_id.clone()))
            .collect();
        let mut seen = HashSet::new();

        while let Some((kind, node_id)) = pending.pop_front() {
            if !seen.insert((kind, node_id.clone())) {
                continue;
            }
            match kind {
                NodeKind::Grade => {
                    if let Some(grade) = load_grade_row(&tx, &node_id)? {
                        rows.grades.push(grade);
                    }
                }
                NodeKind::Block => {
                    let Some(block) = load_block_row(&tx, &node_id)? else {
                        continue;
                    };
                    let links = load_links(&tx, "block_components", &node_id)?;
                    pending.extend(
                        links
                            .iter()
                            .map(|link| (link.child_kind, link.child_id.clone())),
                    );
                    rows.block_components.extend(links);
                    rows.block_actions
                        .extend(load_actions(&tx, "block_actions", &node_id)?);
                    rows.blocks.push(block);
                }
            }
        }

        Ok(rows)
    }

    pub fn method_exists(&self, id: Uuid) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM methods WHERE id = ?1)",
                params![id.to_string()],
                |r| r.get(0),
            )
            .map_err(|e| map_db_err!("check method existence", e))
    }

    /// Summaries of stored methods, newest first
    pub fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>> {
        let mut sql = String::from(
            "SELECT id, name, creator_id, created_at, is_public FROM methods WHERE 1 = 1",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(creator_id) = &filter.creator_id {
            sql.push_str(" AND creator_id = ?");
            params.push(Box::new(creator_id.clone()));
        }
        if filter.public_only {
            sql.push_str(" AND is_public = 1");
        }
        sql.push_str(" ORDER BY created_at DESC, id");

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare list query", e))?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let raw = stmt
            .query_map(param_refs.as_slice(), raw_method_row)
            .map_err(|e| map_db_err!("execute list query", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read list results", e))?;

        let mut summaries = raw
            .into_iter()
            .map(|raw| parse_method_row(raw).map(MethodSummary::from))
            .collect::<Result<Vec<_>>>()?;

        // rfc3339 text order is not chronological across offsets
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

type RawMethodRow = (String, String, String, String, bool);

fn raw_method_row(row: &rusqlite::Row) -> rusqlite::Result<RawMethodRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn parse_method_row(raw: RawMethodRow) -> Result<MethodRow> {
    let (id, name, creator_id, created_at, is_public) = raw;
    let id = Uuid::parse_str(&id)
        .map_err(|e| RubricError::integrity(format!("invalid method id '{}': {}", id, e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            RubricError::integrity(format!(
                "invalid created_at '{}' for method {}: {}",
                created_at, id, e
            ))
        })?;

    Ok(MethodRow {
        id,
        name,
        creator_id,
        created_at,
        is_public,
    })
}

fn load_method_row(conn: &Connection, id: &str) -> Result<Option<MethodRow>> {
    conn.query_row(
        "SELECT id, name, creator_id, created_at, is_public FROM methods WHERE id = ?1",
        params![id],
        raw_method_row,
    )
    .optional()
    .map_err(|e| map_db_err!("query method", e))?
    .map(parse_method_row)
    .transpose()
}

fn load_grade_row(conn: &Connection, id: &str) -> Result<Option<GradeRow>> {
    conn.query_row(
        "SELECT id, name, min, max, step, description, value FROM grades WHERE id = ?1",
        params![id],
        |row| {
            Ok(GradeRow {
                id: row.get(0)?,
                name: row.get(1)?,
                min: row.get(2)?,
                max: row.get(3)?,
                step: row.get(4)?,
                description: row.get(5)?,
                value: row.get(6)?,
            })
        },
    )
    .optional()
    .map_err(|e| map_db_err!("query grade", e))
}

fn load_block_row(conn: &Connection, id: &str) -> Result<Option<BlockRow>> {
    conn.query_row(
        "SELECT id, name FROM blocks WHERE id = ?1",
        params![id],
        |row| {
            Ok(BlockRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(|e| map_db_err!("query block", e))
}

fn load_links(conn: &Connection, table: &str, parent_id: &str) -> Result<Vec<ComponentLink>> {
    let sql = format!(
        "SELECT position, child_kind, child_id FROM {} WHERE parent_id = ?1 ORDER BY position",
        table
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| map_db_err!("prepare component query", e))?;

    let raw = stmt
        .query_map(params![parent_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| map_db_err!("execute component query", e))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read component rows", e))?;

    raw.into_iter()
        .map(|(position, kind, child_id)| {
            Ok(ComponentLink {
                parent_id: parent_id.to_string(),
                position,
                child_kind: NodeKind::from_str(&kind)?,
                child_id,
            })
        })
        .collect()
}

fn load_actions(conn: &Connection, table: &str, owner_id: &str) -> Result<Vec<ActionRow>> {
    let sql = format!(
        "SELECT position, action FROM {} WHERE owner_id = ?1 ORDER BY position",
        table
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| map_db_err!("prepare action query", e))?;

    let raw = stmt
        .query_map(params![owner_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| map_db_err!("execute action query", e))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read action rows", e))?;

    raw.into_iter()
        .map(|(position, tag)| {
            let action = Action::from_str(&tag).map_err(|_| {
                RubricError::integrity(format!(
                    "unknown action '{}' at {}#{}",
                    tag, owner_id, position
                ))
            })?;
            Ok(ActionRow {
                owner_id: owner_id.to_string(),
                position,
                action,
            })
        })
        .collect()
}
