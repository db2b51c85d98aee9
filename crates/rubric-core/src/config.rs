//! Store configuration for rubric
//!
//! Configuration is stored in `<store>/config.toml`. Every key is optional
//! and falls back to its default.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{RubricError, Result};

pub use types::{Backend, DisplayConfig, DocumentConfig, StoreConfig, STORE_FORMAT_VERSION};

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;

        if config.version > STORE_FORMAT_VERSION {
            return Err(RubricError::integrity(format!(
                "store format version {} is newer than supported version {}",
                config.version, STORE_FORMAT_VERSION
            )));
        }

        Ok(config)
    }

    /// Load configuration, or defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(StoreConfig::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RubricError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
