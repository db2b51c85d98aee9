//! Configuration type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::RubricError;

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Which driver persists grading methods
    #[serde(default)]
    pub backend: Backend,

    /// Rendering of normalized values
    #[serde(default)]
    pub display: DisplayConfig,

    /// Document backend serialization
    #[serde(default)]
    pub document: DocumentConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            backend: Backend::default(),
            display: DisplayConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

/// Persistence backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite tables, one row per node
    #[default]
    Relational,
    /// One JSON document per method
    Document,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Relational => "relational",
            Backend::Document => "document",
        }
    }
}

impl FromStr for Backend {
    type Err = RubricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relational" | "sqlite" => Ok(Backend::Relational),
            "document" | "json" => Ok(Backend::Document),
            other => bail_invalid!("backend", other),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display settings for percentages and stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of stars a full score renders as
    #[serde(default = "default_stars")]
    pub stars: u8,

    /// Decimal places for human output
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            stars: default_stars(),
            precision: default_precision(),
        }
    }
}

fn default_stars() -> u8 {
    5
}

fn default_precision() -> usize {
    2
}

/// Serializer settings handed to the document store when it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Indent written documents
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}
