//! SQLite database module for rubric
//!
//! The database is the relational backend: every method is flattened by the
//! relational codec and written as a whole tree inside one transaction.

mod methods;
mod orphans;
mod schema;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{RubricError, Result};
use crate::map_db_err;

pub use schema::{create_schema, SchemaCreateResult, CURRENT_SCHEMA_VERSION};

/// Database file name inside a store
pub const DATABASE_FILE: &str = "rubric.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database for rubric
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    #[tracing::instrument(skip(store_root), fields(store_root = %store_root.display()))]
    pub fn open(store_root: &Path) -> Result<Self> {
        let db_path = store_root.join(DATABASE_FILE);

        let conn = Connection::open(&db_path).map_err(|e| {
            RubricError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| map_db_err!("enable WAL mode", e))?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| map_db_err!("open database", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| map_db_err!("set busy timeout", e))?;

        match create_schema(&conn).map_err(|e| map_db_err!("create database schema", e))? {
            SchemaCreateResult::Unsupported(version) => {
                return Err(RubricError::integrity(format!(
                    "database schema version {} is newer than supported version {}",
                    version, CURRENT_SCHEMA_VERSION
                )));
            }
            SchemaCreateResult::Created | SchemaCreateResult::Current => {}
        }

        Ok(Database { conn })
    }

    /// Start a write transaction.
    ///
    /// Takes the write lock up front so whole-tree replacements and orphan
    /// cleanup never interleave with another writer.
    fn begin_write(&self, operation: &str) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| RubricError::transaction(operation, e))
    }

    /// Start a read transaction so a whole tree is read from one snapshot
    fn begin_read(&self, operation: &str) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Deferred)
            .map_err(|e| RubricError::transaction(operation, e))
    }

    pub fn get_method_count(&self) -> Result<i64> {
        self.count("methods")
    }

    pub fn get_grade_count(&self) -> Result<i64> {
        self.count("grades")
    }

    pub fn get_block_count(&self) -> Result<i64> {
        self.count("blocks")
    }

    fn count(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .map_err(|e| RubricError::Other(format!("failed to count {}: {}", table, e)))
    }

    pub fn get_schema_version(&self) -> Result<i32> {
        self.conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| RubricError::Other(format!("failed to get schema version: {}", e)))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint WAL so the next process sees every committed tree
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

#[cfg(test)]
mod tests;
