//! Relational codec
//!
//! Flattens a method into normalized rows:
//!
//! | table               | key                    | content                                   |
//! |---------------------|------------------------|-------------------------------------------|
//! | `methods`           | `id`                   | name, creator, creation time, visibility  |
//! | `grades`            | `id`                   | name, bounds, step, description, value    |
//! | `blocks`            | `id`                   | name                                      |
//! | `method_components` | `(parent_id, position)`| `child_kind`, `child_id`                  |
//! | `block_components`  | `(parent_id, position)`| `child_kind`, `child_id`                  |
//! | `method_actions`    | `(owner_id, position)` | action tag                                |
//! | `block_actions`     | `(owner_id, position)` | action tag                                |
//!
//! Grade and block ids are generated at encode time, so every save of a
//! method produces a fresh set of node rows.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use ulid::Ulid;
use uuid::Uuid;

use super::corrupt;
use crate::error::{RubricError, Result};
use crate::gradable::{Action, Gradable, Grade, GradingBlock, GradingMethod, NodeKind};

/// Row of the `methods` table
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRow {
    pub id: Uuid,
    pub name: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

/// Row of the `grades` table
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRow {
    pub id: String,
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub description: Option<String>,
    pub value: Option<f64>,
}

/// Row of the `blocks` table
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRow {
    pub id: String,
    pub name: String,
}

/// Row of `method_components` or `block_components`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentLink {
    pub parent_id: String,
    pub position: i64,
    pub child_kind: NodeKind,
    pub child_id: String,
}

/// Row of `method_actions` or `block_actions`
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub owner_id: String,
    pub position: i64,
    pub action: Action,
}

/// All rows describing one method
#[derive(Debug, Clone, PartialEq)]
pub struct RelationalRows {
    pub method: MethodRow,
    pub grades: Vec<GradeRow>,
    pub blocks: Vec<BlockRow>,
    pub method_components: Vec<ComponentLink>,
    pub block_components: Vec<ComponentLink>,
    pub method_actions: Vec<ActionRow>,
    pub block_actions: Vec<ActionRow>,
}

impl RelationalRows {
    fn empty(method: MethodRow) -> Self {
        RelationalRows {
            method,
            grades: Vec::new(),
            blocks: Vec::new(),
            method_components: Vec::new(),
            block_components: Vec::new(),
            method_actions: Vec::new(),
            block_actions: Vec::new(),
        }
    }
}

/// Generate an id for a grade or block row
pub fn new_node_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

/// Flatten a method into rows
pub fn encode(method: &GradingMethod) -> RelationalRows {
    let mut rows = RelationalRows::empty(MethodRow {
        id: method.id(),
        name: method.name().to_string(),
        creator_id: method.creator_id().to_string(),
        created_at: method.created_at(),
        is_public: method.is_public(),
    });

    let method_id = method.id().to_string();
    for (position, component) in method.components().iter().enumerate() {
        let (child_kind, child_id) = encode_node(component, &mut rows);
        rows.method_components.push(ComponentLink {
            parent_id: method_id.clone(),
            position: position as i64,
            child_kind,
            child_id,
        });
    }
    rows.method_actions = action_rows(&method_id, method.actions());

    rows
}

fn encode_node(node: &Gradable, rows: &mut RelationalRows) -> (NodeKind, String) {
    let id = new_node_id();
    match node {
        Gradable::Grade(grade) => {
            rows.grades.push(GradeRow {
                id: id.clone(),
                name: grade.name().to_string(),
                min: grade.min(),
                max: grade.max(),
                step: grade.step(),
                description: grade.description().map(str::to_string),
                value: grade.current(),
            });
            (NodeKind::Grade, id)
        }
        Gradable::Block(block) => {
            rows.blocks.push(BlockRow {
                id: id.clone(),
                name: block.name().to_string(),
            });
            for (position, component) in block.components().iter().enumerate() {
                let (child_kind, child_id) = encode_node(component, rows);
                rows.block_components.push(ComponentLink {
                    parent_id: id.clone(),
                    position: position as i64,
                    child_kind,
                    child_id,
                });
            }
            let actions = action_rows(&id, block.actions());
            rows.block_actions.extend(actions);
            (NodeKind::Block, id)
        }
    }
}

fn action_rows(owner_id: &str, actions: &[Action]) -> Vec<ActionRow> {
    actions
        .iter()
        .enumerate()
        .map(|(position, action)| ActionRow {
            owner_id: owner_id.to_string(),
            position: position as i64,
            action: *action,
        })
        .collect()
}

/// Rebuild a method from its rows.
///
/// Starts at the method's component links, resolves each child by kind and
/// id, and recurses into blocks through `block_components`. Links and
/// actions are applied in `position` order.
pub fn decode(rows: &RelationalRows) -> Result<GradingMethod> {
    let index = RowIndex::new(rows)?;
    let method_id = rows.method.id.to_string();

    let mut method = GradingMethod::restore(
        rows.method.id,
        rows.method.created_at,
        &rows.method.name,
        &rows.method.creator_id,
        rows.method.is_public,
    );

    let mut path = HashSet::new();
    let links = index.method_links.get(method_id.as_str());
    let actions = index.method_actions.get(method_id.as_str());
    index.fill_block(method.root_mut(), links, actions, &mut path)?;

    let context = format!("rows for method {}", method_id);
    method.validate().map_err(|e| corrupt(&context, e))?;
    Ok(method)
}

/// Lookup tables over a set of rows, with links and actions sorted by position
struct RowIndex<'a> {
    grades: HashMap<&'a str, &'a GradeRow>,
    blocks: HashMap<&'a str, &'a BlockRow>,
    method_links: HashMap<&'a str, Vec<&'a ComponentLink>>,
    block_links: HashMap<&'a str, Vec<&'a ComponentLink>>,
    method_actions: HashMap<&'a str, Vec<&'a ActionRow>>,
    block_actions: HashMap<&'a str, Vec<&'a ActionRow>>,
}

impl<'a> RowIndex<'a> {
    fn new(rows: &'a RelationalRows) -> Result<Self> {
        Ok(RowIndex {
            grades: rows.grades.iter().map(|g| (g.id.as_str(), g)).collect(),
            blocks: rows.blocks.iter().map(|b| (b.id.as_str(), b)).collect(),
            method_links: group_links(&rows.method_components)?,
            block_links: group_links(&rows.block_components)?,
            method_actions: group_actions(&rows.method_actions)?,
            block_actions: group_actions(&rows.block_actions)?,
        })
    }

    fn fill_block(
        &self,
        block: &mut GradingBlock,
        links: Option<&Vec<&'a ComponentLink>>,
        actions: Option<&Vec<&'a ActionRow>>,
        path: &mut HashSet<&'a str>,
    ) -> Result<()> {
        for link in links.into_iter().flatten().copied() {
            block.add_grade(self.resolve(link, path)?);
        }
        for row in actions.into_iter().flatten() {
            block.add_action(row.action);
        }
        Ok(())
    }

    fn resolve(&self, link: &'a ComponentLink, path: &mut HashSet<&'a str>) -> Result<Gradable> {
        let child_id = link.child_id.as_str();
        match link.child_kind {
            NodeKind::Grade => {
                let row = self.grades.get(child_id).ok_or_else(|| {
                    RubricError::integrity(format!(
                        "link {}#{} points to missing grade {}",
                        link.parent_id, link.position, child_id
                    ))
                })?;
                decode_grade(row).map(Gradable::Grade)
            }
            NodeKind::Block => {
                let row = self.blocks.get(child_id).ok_or_else(|| {
                    RubricError::integrity(format!(
                        "link {}#{} points to missing block {}",
                        link.parent_id, link.position, child_id
                    ))
                })?;
                if !path.insert(child_id) {
                    return Err(RubricError::integrity(format!(
                        "block {} contains itself",
                        child_id
                    )));
                }

                let mut block = GradingBlock::new(&row.name);
                self.fill_block(
                    &mut block,
                    self.block_links.get(child_id),
                    self.block_actions.get(child_id),
                    path,
                )?;
                path.remove(child_id);
                Ok(Gradable::Block(block))
            }
        }
    }
}

fn decode_grade(row: &GradeRow) -> Result<Grade> {
    let context = format!("grade row {}", row.id);
    let mut grade = Grade::new(&row.name, row.min, row.max, row.step, row.description.clone())
        .map_err(|e| corrupt(&context, e))?;
    if let Some(value) = row.value {
        grade.update_grade(value).map_err(|e| corrupt(&context, e))?;
    }
    Ok(grade)
}

fn group_links(links: &[ComponentLink]) -> Result<HashMap<&str, Vec<&ComponentLink>>> {
    let mut grouped: HashMap<&str, Vec<&ComponentLink>> = HashMap::new();
    for link in links {
        grouped.entry(link.parent_id.as_str()).or_default().push(link);
    }
    for (parent, group) in grouped.iter_mut() {
        group.sort_by_key(|link| link.position);
        if group.windows(2).any(|w| w[0].position == w[1].position) {
            return Err(RubricError::integrity(format!(
                "duplicate component position under {}",
                parent
            )));
        }
    }
    Ok(grouped)
}

fn group_actions(actions: &[ActionRow]) -> Result<HashMap<&str, Vec<&ActionRow>>> {
    let mut grouped: HashMap<&str, Vec<&ActionRow>> = HashMap::new();
    for row in actions {
        grouped.entry(row.owner_id.as_str()).or_default().push(row);
    }
    for (owner, group) in grouped.iter_mut() {
        group.sort_by_key(|row| row.position);
        if group.windows(2).any(|w| w[0].position == w[1].position) {
            return Err(RubricError::integrity(format!(
                "duplicate action position under {}",
                owner
            )));
        }
    }
    Ok(grouped)
}
