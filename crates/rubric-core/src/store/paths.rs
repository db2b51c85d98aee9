//! Store layout

use std::path::{Path, PathBuf};

use crate::error::{RubricError, Result};

/// Default store directory name
pub const DEFAULT_STORE_DIR: &str = ".rubric";

/// Configuration file inside a store
pub const CONFIG_FILE: &str = "config.toml";

/// Document backend directory inside a store
pub const METHODS_DIR: &str = "methods";

/// Walk up from `start` looking for a store directory
pub fn discover_store(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(DEFAULT_STORE_DIR);
        if candidate.is_dir() {
            tracing::debug!(store = %candidate.display(), "store discovered");
            return Ok(candidate);
        }
    }

    Err(RubricError::StoreNotFound {
        search_root: start.to_path_buf(),
    })
}
