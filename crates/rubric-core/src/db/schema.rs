//! SQLite database schema for rubric

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Result of schema creation
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaCreateResult {
    /// Fresh database, schema created
    Created,
    /// Existing database already at the current version
    Current,
    /// Database was written by a newer version of rubric
    Unsupported(i32),
}

const SCHEMA_SQL: &str = r#"
-- Grading methods (one row per method, root metadata only)
CREATE TABLE IF NOT EXISTS methods (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    creator_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    is_public INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_methods_creator ON methods(creator_id);
CREATE INDEX IF NOT EXISTS idx_methods_public ON methods(is_public);

-- Leaves
CREATE TABLE IF NOT EXISTS grades (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    min REAL NOT NULL,
    max REAL NOT NULL,
    step REAL NOT NULL,
    description TEXT,
    value REAL
);

-- Composites
CREATE TABLE IF NOT EXISTS blocks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- Ordered components of a method's root
CREATE TABLE IF NOT EXISTS method_components (
    parent_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    child_kind TEXT NOT NULL,
    child_id TEXT NOT NULL,
    PRIMARY KEY (parent_id, position)
);
CREATE INDEX IF NOT EXISTS idx_method_components_child ON method_components(child_kind, child_id);

-- Ordered components of a nested block
CREATE TABLE IF NOT EXISTS block_components (
    parent_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    child_kind TEXT NOT NULL,
    child_id TEXT NOT NULL,
    PRIMARY KEY (parent_id, position)
);
CREATE INDEX IF NOT EXISTS idx_block_components_child ON block_components(child_kind, child_id);

-- Ordered actions of a method's root
CREATE TABLE IF NOT EXISTS method_actions (
    owner_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    action TEXT NOT NULL,
    PRIMARY KEY (owner_id, position)
);

-- Ordered actions of a nested block
CREATE TABLE IF NOT EXISTS block_actions (
    owner_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    action TEXT NOT NULL,
    PRIMARY KEY (owner_id, position)
);

-- Grades or blocks owned directly by a rating
CREATE TABLE IF NOT EXISTS rating_roots (
    rating_id TEXT PRIMARY KEY,
    child_kind TEXT NOT NULL,
    child_id TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rating_roots_child ON rating_roots(child_kind, child_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

pub fn create_schema(conn: &Connection) -> Result<SchemaCreateResult> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    let result = match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
                [&CURRENT_SCHEMA_VERSION.to_string()],
            )?;
            tracing::debug!(version = CURRENT_SCHEMA_VERSION, "Database schema created");
            SchemaCreateResult::Created
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => SchemaCreateResult::Current,
        Some(v) => SchemaCreateResult::Unsupported(v),
    };

    Ok(result)
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}
