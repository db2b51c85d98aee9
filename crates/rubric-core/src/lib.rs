//! Rubric Core Library
//!
//! Hierarchical grading rubrics: building trees of bounded leaves combined
//! by arithmetic actions, applying values by path, and persisting whole
//! trees through a JSON document codec or a relational SQLite codec.

pub mod builder;
pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod gradable;
pub mod grader;
pub mod logging;
pub mod store;
pub mod view;
